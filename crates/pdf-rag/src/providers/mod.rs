//! Capability abstractions for loading, chunking, embedding and generation
//!
//! Each stage of the pipeline is a trait so that backends can be swapped
//! (and stubbed in tests) without touching the lifecycle or the server.

pub mod chunker;
pub mod embedding;
pub mod llm;
pub mod loader;
pub mod ollama;
pub mod openai;
pub mod pdf;

pub use chunker::Chunker;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use loader::DocumentLoader;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use openai::OpenAiCompatibleLlm;
pub use pdf::PdfLoader;

use std::sync::Arc;

use crate::config::{LlmProviderKind, RagConfig};
use crate::error::Result;
use crate::ingestion::SemanticChunker;

/// The set of capabilities the service runs on
#[derive(Clone)]
pub struct Providers {
    pub loader: Arc<dyn DocumentLoader>,
    pub chunker: Arc<dyn Chunker>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LlmProvider>,
}

impl Providers {
    /// Build the configured backends: PDF loader, semantic chunker over the
    /// Ollama embedder, and the selected generation provider
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OllamaEmbedder::new(&config.embeddings)?);

        let llm: Arc<dyn LlmProvider> = match config.llm.provider {
            LlmProviderKind::Openai => Arc::new(OpenAiCompatibleLlm::new(&config.llm)?),
            LlmProviderKind::Ollama => Arc::new(OllamaLlm::new(&config.llm)?),
        };

        let chunker = Arc::new(SemanticChunker::new(Arc::clone(&embedder), &config.chunking));

        tracing::info!(
            "Providers: embeddings={} ({}), generation={} ({})",
            embedder.name(),
            config.embeddings.base_url,
            llm.name(),
            config.llm.base_url
        );

        Ok(Self {
            loader: Arc::new(PdfLoader::new()),
            chunker,
            embedder,
            llm,
        })
    }
}

//! Configuration for the PDF question-answering service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Where the uploaded document and the persisted index live
    pub storage: StorageConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Semantic chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Answer generation configuration
    pub llm: LlmConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let mut config: Self = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))?;
        config.llm.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.llm.apply_env();
        config
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.max_upload_size == 0 {
            return Err(Error::Config("server.max_upload_size must be > 0".into()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be > 0".into()));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config("embeddings.batch_size must be > 0".into()));
        }
        if !(0.0..=100.0).contains(&self.chunking.breakpoint_percentile) {
            return Err(Error::Config(
                "chunking.breakpoint_percentile must be within [0, 100]".into(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config("llm.temperature must be within [0, 2]".into()));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::Config("llm.max_tokens must be > 0".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allow any origin, method and header
    pub enable_cors: bool,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Single-document storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// The one active document; every upload overwrites it
    pub document_path: PathBuf,
    /// Directory holding the persisted vector index
    pub index_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("uploaded.pdf"),
            index_dir: PathBuf::from("vector_index"),
        }
    }
}

/// Embedding model configuration (Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Texts per embedding request
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for failed embedding requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            batch_size: 32,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Semantic chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Neighbouring sentences on each side folded into a comparison window
    pub buffer_size: usize,
    /// Percentile of consecutive-window distances above which a chunk is cut
    pub breakpoint_percentile: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1,
            breakpoint_percentile: 95.0,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks passed to the generator
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 2 }
    }
}

/// Which generation backend to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// OpenAI-compatible chat completions (LM Studio, vLLM, llama.cpp server)
    #[default]
    Openai,
    /// Ollama `/api/generate`
    Ollama,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Base URL of the generation server
    pub base_url: String,
    /// Bearer key; `OPENAI_API_KEY` overrides it
    pub api_key: String,
    /// Model name; empty means the server's loaded model
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Openai,
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            model: String::new(),
            temperature: 0.7,
            max_tokens: 512,
            timeout_secs: 600, // local models can be slow on long contexts
        }
    }
}

impl LlmConfig {
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }
    }
}

//! Deterministic stand-ins for the external backends

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pdf_rag::config::RagConfig;
use pdf_rag::error::{Error, Result};
use pdf_rag::ingestion::SemanticChunker;
use pdf_rag::providers::{DocumentLoader, EmbeddingProvider, LlmProvider, Providers};
use pdf_rag::types::PageSegment;

pub const DIMENSIONS: usize = 64;

/// Bag-of-words embedder: each lowercase word bumps one hashed bucket
pub struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % DIMENSIONS as u64) as usize] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash-bow"
    }
}

/// Same words-to-buckets scheme as `HashEmbedder`, folded into 8 buckets
pub struct NarrowEmbedder;

#[async_trait]
impl EmbeddingProvider for NarrowEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let wide = HashEmbedder.embed(text).await?;
        let mut vector = vec![0.0f32; 8];
        for (i, value) in wide.into_iter().enumerate() {
            vector[i % 8] += value;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        8
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash-bow-8"
    }
}

/// Reads the stored bytes as UTF-8; form feeds separate pages
pub struct TextLoader;

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self, path: &Path, source: &str) -> Result<Vec<PageSegment>> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::document_load(e.to_string()))?;
        let text = String::from_utf8(data).map_err(|e| Error::document_load(e.to_string()))?;

        let segments: Vec<PageSegment> = text
            .split('\x0c')
            .enumerate()
            .filter(|(_, page)| !page.trim().is_empty())
            .map(|(i, page)| PageSegment::new(page.trim(), source, i as u32 + 1))
            .collect();

        if segments.is_empty() {
            return Err(Error::document_load("no text"));
        }
        Ok(segments)
    }
}

/// Answers with the context block of the prompt and counts its calls
#[derive(Default)]
pub struct EchoLlm {
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl EchoLlm {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for EchoLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        let context = prompt
            .split_once("Context: ")
            .and_then(|(_, rest)| rest.split_once("\nQuestion:"))
            .map(|(context, _)| context.to_string())
            .unwrap_or_default();
        Ok(context)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Generator that always fails
pub struct DownLlm;

#[async_trait]
impl LlmProvider for DownLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("connection refused"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "down"
    }

    fn model(&self) -> &str {
        "down"
    }
}

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub config: RagConfig,
    pub llm: Arc<EchoLlm>,
    pub providers: Providers,
}

impl Harness {
    pub fn new() -> Self {
        let llm = Arc::new(EchoLlm::default());
        Self::with_llm(llm.clone(), llm)
    }

    pub fn with_llm(llm: Arc<EchoLlm>, generator: Arc<dyn LlmProvider>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RagConfig::default();
        config.storage.document_path = dir.path().join("uploaded.pdf");
        config.storage.index_dir = dir.path().join("vector_index");

        let providers = stub_providers(&config, generator);
        Self {
            dir,
            config,
            llm,
            providers,
        }
    }

    pub fn index_dir(&self) -> PathBuf {
        self.config.storage.index_dir.clone()
    }
}

pub fn stub_providers(config: &RagConfig, llm: Arc<dyn LlmProvider>) -> Providers {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder);
    Providers {
        loader: Arc::new(TextLoader),
        chunker: Arc::new(SemanticChunker::new(Arc::clone(&embedder), &config.chunking)),
        embedder,
        llm,
    }
}

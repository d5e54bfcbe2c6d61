//! Embedding provider trait for turning text into vectors

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// The same provider must embed both chunks and questions so that scores
/// are comparable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving order
    ///
    /// Default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Vector length produced by this provider
    fn dimensions(&self) -> usize;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Model or provider name, recorded in the persisted index
    fn name(&self) -> &str;
}

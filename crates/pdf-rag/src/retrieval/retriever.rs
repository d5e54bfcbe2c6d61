//! Top-k retrieval bound to one published index

use std::sync::Arc;

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

use super::index::VectorIndex;

/// Embeds questions and returns the nearest chunks of a single index
///
/// A retriever never changes the index it was created with; a rebuild
/// publishes a new retriever instead.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    k: usize,
}

impl Retriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>, k: usize) -> Self {
        Self { index, embedder, k }
    }

    /// Up to `k` chunks, most similar first
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Chunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_embedding, self.k)?;

        tracing::debug!(
            "Retrieved {} chunks (best score {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );

        Ok(hits.into_iter().map(|hit| hit.chunk).collect())
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }
}

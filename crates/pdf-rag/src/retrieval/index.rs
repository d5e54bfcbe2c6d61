//! Exact cosine-similarity vector index with JSON persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Chunk;

/// File the index is persisted to inside its directory
pub const INDEX_FILE: &str = "index.json";

/// A chunk together with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A search hit
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Nearest-neighbour index over one document's chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Length shared by every embedding
    dimensions: usize,
    /// Embedding model the vectors came from
    model: String,
    created_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from chunks and their embeddings (same order)
    pub fn build(
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
        dimensions: usize,
        model: impl Into<String>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::IndexBuild(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(Error::IndexBuild(format!(
                    "Embedding dimension mismatch for chunk {}: expected {}, got {}",
                    chunk.sequence_index,
                    dimensions,
                    embedding.len()
                )));
            }
            entries.push(IndexEntry { chunk, embedding });
        }

        Ok(Self {
            dimensions,
            model: model.into(),
            created_at: Utc::now(),
            entries,
        })
    }

    /// The `k` chunks most similar to `query`, best first
    ///
    /// Equal scores keep document order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Query dimension mismatch: expected {}, got {}",
                self.dimensions,
                query.len()
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                score: cosine_similarity(query, &entry.embedding),
                chunk: entry.chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
        });
        scored.truncate(k);

        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Fail unless queries from `model` with `dimensions`-long vectors can search this index
    pub fn ensure_compatible(&self, model: &str, dimensions: usize) -> Result<()> {
        if self.model != model || self.dimensions != dimensions {
            return Err(Error::IndexBuild(format!(
                "Index was built with {} ({} dims), embedder is {} ({} dims)",
                self.model, self.dimensions, model, dimensions
            )));
        }
        Ok(())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Source label of the indexed document, taken from its first chunk
    pub fn document_label(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.chunk.source_label())
    }

    /// Write the index to `dir/index.json`, creating `dir` if needed
    pub async fn save(&self, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        let data = serde_json::to_vec(self)?;
        tokio::fs::write(index_file(dir), data).await?;
        tracing::debug!("Saved index with {} entries to {}", self.len(), dir.display());
        Ok(())
    }

    /// Read an index previously written by `save`
    pub async fn load(dir: &Path) -> Result<Self> {
        let data = tokio::fs::read(index_file(dir)).await?;
        let index: Self = serde_json::from_slice(&data)?;

        if let Some(bad) = index
            .entries
            .iter()
            .find(|entry| entry.embedding.len() != index.dimensions)
        {
            return Err(Error::IndexBuild(format!(
                "Persisted index is inconsistent at chunk {}",
                bad.chunk.sequence_index
            )));
        }

        Ok(index)
    }

    /// Whether a persisted index exists under `dir`
    pub async fn exists(dir: &Path) -> bool {
        tokio::fs::try_exists(index_file(dir)).await.unwrap_or(false)
    }

    /// Delete every file in `dir`, then `dir` itself; a missing `dir` is fine
    pub async fn remove(dir: &Path) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
        }
        tokio::fs::remove_dir(dir).await?;

        tracing::debug!("Removed index directory {}", dir.display());
        Ok(())
    }
}

fn index_file(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILE)
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

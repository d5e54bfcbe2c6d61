//! Rebuilds the persisted vector index from the stored document

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::providers::{Chunker, DocumentLoader, EmbeddingProvider, Providers};
use crate::retrieval::VectorIndex;

/// Load, chunk, embed and persist one document
///
/// The previous index directory is deleted before anything else happens,
/// so a failed rebuild leaves no index on disk.
pub struct ChunkStoreBuilder {
    loader: Arc<dyn DocumentLoader>,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index_dir: PathBuf,
}

impl ChunkStoreBuilder {
    pub fn new(providers: &Providers, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: Arc::clone(&providers.loader),
            chunker: Arc::clone(&providers.chunker),
            embedder: Arc::clone(&providers.embedder),
            index_dir: index_dir.into(),
        }
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Rebuild the index from `document`, labelling chunks with `source`
    ///
    /// Every failure comes back as `Error::IndexBuild`.
    pub async fn rebuild(&self, document: &Path, source: &str) -> Result<VectorIndex> {
        self.try_rebuild(document, source)
            .await
            .map_err(Error::into_index_build)
    }

    async fn try_rebuild(&self, document: &Path, source: &str) -> Result<VectorIndex> {
        let start = Instant::now();

        VectorIndex::remove(&self.index_dir).await?;

        let segments = self.loader.load(document, source).await?;
        tracing::info!("Loaded {} page segments from {}", segments.len(), source);

        let chunks = self.chunker.split(&segments).await?;
        if chunks.is_empty() {
            return Err(Error::IndexBuild(format!("{} produced no chunks", source)));
        }
        tracing::info!("Created {} chunks from {}", chunks.len(), source);

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let index = VectorIndex::build(
            chunks,
            embeddings,
            self.embedder.dimensions(),
            self.embedder.name(),
        )?;
        index.save(&self.index_dir).await?;

        tracing::info!(
            "Indexed {} chunks from {} in {:?}",
            index.len(),
            source,
            start.elapsed()
        );
        Ok(index)
    }
}

//! Owner of the process-wide index state
//!
//! The index, the retriever bound to it and the cached answer pipeline move
//! together as one generation. Readers take a short read lock and clone an
//! `Arc`; rebuilds are serialized by a separate async mutex and only take the
//! write lock to swap in the finished generation.

use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{AnswerPipeline, PromptTemplate};
use crate::ingestion::{ChunkStoreBuilder, DocumentSlot};
use crate::providers::Providers;
use crate::retrieval::{Retriever, VectorIndex};
use crate::types::{QueryResult, StatusResponse};

/// A published index and the retriever bound to it
struct Published {
    retriever: Retriever,
    document: String,
}

#[derive(Default)]
struct Slots {
    current: Option<Published>,
    /// Built on first use, dropped whenever `current` changes
    pipeline: Option<Arc<AnswerPipeline>>,
    generation: u64,
}

/// Index lifecycle manager
pub struct IndexLifecycle {
    slots: RwLock<Slots>,
    rebuild_lock: Mutex<()>,
    builder: ChunkStoreBuilder,
    slot: DocumentSlot,
    providers: Providers,
    template: PromptTemplate,
    top_k: usize,
}

impl IndexLifecycle {
    /// Empty lifecycle: nothing is indexed until `rebuild`, `upload` or `prime`
    pub fn new(config: &RagConfig, providers: Providers) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            rebuild_lock: Mutex::new(()),
            builder: ChunkStoreBuilder::new(&providers, &config.storage.index_dir),
            slot: DocumentSlot::new(&config.storage.document_path),
            providers,
            template: PromptTemplate::default(),
            top_k: config.retrieval.top_k,
        }
    }

    /// Rebuild the index from `document` and publish it
    pub async fn rebuild(&self, document: &Path) -> Result<()> {
        let _guard = self.rebuild_lock.lock().await;
        let label = self.label_for(document).await;
        self.rebuild_locked(document, &label).await
    }

    /// Replace the stored document with an upload and rebuild from it
    ///
    /// Storing and rebuilding happen under the same rebuild lock, so two
    /// concurrent uploads cannot index each other's bytes.
    pub async fn upload(&self, data: &[u8], filename: &str) -> Result<()> {
        let _guard = self.rebuild_lock.lock().await;
        self.slot
            .store(data, filename)
            .await
            .map_err(Error::into_index_build)?;
        self.rebuild_locked(self.slot.path(), filename).await
    }

    async fn rebuild_locked(&self, document: &Path, label: &str) -> Result<()> {
        match self.builder.rebuild(document, label).await {
            Ok(index) => {
                let retriever = Retriever::new(
                    Arc::new(index),
                    Arc::clone(&self.providers.embedder),
                    self.top_k,
                );
                let generation = self.publish(Some(Published {
                    retriever,
                    document: label.to_string(),
                }));
                tracing::info!("Published index generation {} for {}", generation, label);
                Ok(())
            }
            Err(e) => {
                // The on-disk index is already gone; match it in memory
                let generation = self.publish(None);
                tracing::error!(
                    "Rebuild from {} failed, generation {} has no index: {}",
                    label,
                    generation,
                    e
                );
                Err(e)
            }
        }
    }

    /// Swap in a new generation and drop the cached pipeline
    fn publish(&self, current: Option<Published>) -> u64 {
        let mut slots = self.slots.write();
        slots.current = current;
        slots.pipeline = None;
        slots.generation += 1;
        slots.generation
    }

    /// The cached pipeline, built from the current retriever on first use
    pub fn current_pipeline(&self) -> Result<Arc<AnswerPipeline>> {
        if let Some(pipeline) = self.slots.read().pipeline.as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        let mut slots = self.slots.write();
        if let Some(pipeline) = slots.pipeline.as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        let retriever = slots
            .current
            .as_ref()
            .map(|published| published.retriever.clone())
            .ok_or(Error::NoIndex)?;

        let pipeline = Arc::new(AnswerPipeline::new(
            retriever,
            Arc::clone(&self.providers.llm),
            self.template.clone(),
        ));
        slots.pipeline = Some(Arc::clone(&pipeline));
        tracing::debug!("Built answer pipeline for generation {}", slots.generation);

        Ok(pipeline)
    }

    /// Answer a question against the current generation
    pub async fn answer(&self, question: &str) -> Result<QueryResult> {
        crate::types::validate_question(question)?;
        let pipeline = self.current_pipeline()?;
        pipeline.answer(question).await
    }

    /// One consistent view of the published state
    pub fn status(&self) -> StatusResponse {
        let slots = self.slots.read();
        match slots.current.as_ref() {
            Some(published) => StatusResponse {
                indexed: true,
                generation: slots.generation,
                chunks: published.retriever.index().len(),
                document: Some(published.document.clone()),
            },
            None => StatusResponse {
                indexed: false,
                generation: slots.generation,
                chunks: 0,
                document: None,
            },
        }
    }

    /// Best-effort startup indexing
    ///
    /// Rebuilds from the stored document when there is one, otherwise loads a
    /// previously persisted index. Failures are logged and leave no index.
    pub async fn prime(&self) {
        if self.slot.exists().await {
            tracing::info!(
                "Found stored document at {}, indexing",
                self.slot.path().display()
            );
            if let Err(e) = self.rebuild(self.slot.path()).await {
                tracing::warn!("Startup indexing failed, starting without an index: {}", e);
            }
            return;
        }

        let index_dir = self.builder.index_dir();
        if !VectorIndex::exists(index_dir).await {
            tracing::info!("No stored document or index; waiting for an upload");
            return;
        }

        let _guard = self.rebuild_lock.lock().await;
        let loaded = VectorIndex::load(index_dir).await.and_then(|index| {
            let embedder = &self.providers.embedder;
            index.ensure_compatible(embedder.name(), embedder.dimensions())?;
            Ok(index)
        });
        match loaded {
            Ok(index) => {
                let document = index.document_label().unwrap_or("unknown").to_string();
                let chunks = index.len();
                let built = index.created_at();
                let retriever = Retriever::new(
                    Arc::new(index),
                    Arc::clone(&self.providers.embedder),
                    self.top_k,
                );
                let generation = self.publish(Some(Published {
                    retriever,
                    document: document.clone(),
                }));
                tracing::info!(
                    "Loaded persisted index for {} ({} chunks, built {}, generation {})",
                    document,
                    chunks,
                    built,
                    generation
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Could not use persisted index from {}, starting without an index: {}",
                    index_dir.display(),
                    e
                );
            }
        }
    }

    async fn label_for(&self, document: &Path) -> String {
        if document == self.slot.path() {
            return self.slot.label().await;
        }
        document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| document.display().to_string())
    }
}

//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::lifecycle::IndexLifecycle;
use crate::providers::Providers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// The single document/index generation
    lifecycle: IndexLifecycle,
}

impl AppState {
    /// Create application state with an empty lifecycle
    pub fn new(config: RagConfig, providers: Providers) -> Self {
        tracing::info!(
            "Initializing state (document: {}, index: {}, k = {})",
            config.storage.document_path.display(),
            config.storage.index_dir.display(),
            config.retrieval.top_k
        );

        let lifecycle = IndexLifecycle::new(&config, providers);
        Self {
            inner: Arc::new(AppStateInner { config, lifecycle }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the index lifecycle
    pub fn lifecycle(&self) -> &IndexLifecycle {
        &self.inner.lifecycle
    }
}

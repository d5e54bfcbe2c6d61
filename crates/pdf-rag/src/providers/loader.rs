//! Document loader trait

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::PageSegment;

/// Turns a stored document into ordered page segments
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load `path`, labelling every segment with `source`
    ///
    /// Fails with `Error::DocumentLoad` when the file is unreadable or holds no text.
    async fn load(&self, path: &Path, source: &str) -> Result<Vec<PageSegment>>;
}

//! Chunker trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, PageSegment};

/// Splits page segments into retrieval chunks
#[async_trait]
pub trait Chunker: Send + Sync {
    /// Split `segments` in order
    ///
    /// Chunks never span two segments and carry a contiguous
    /// `sequence_index` starting at 0.
    async fn split(&self, segments: &[PageSegment]) -> Result<Vec<Chunk>>;
}

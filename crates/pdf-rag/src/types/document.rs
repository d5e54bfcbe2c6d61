//! Document, page and chunk types with source tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the document label a chunk came from
pub const SOURCE_KEY: &str = "source";

/// Metadata key carrying the 1-based page number
pub const PAGE_KEY: &str = "page";

/// Label reported when a chunk carries no source metadata
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Text extracted from one page of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSegment {
    /// Extracted text
    pub text: String,
    /// Origin metadata (source label, page number)
    pub metadata: HashMap<String, String>,
}

impl PageSegment {
    /// Create a segment for `page` (1-based) of the document labelled `source`
    pub fn new(text: impl Into<String>, source: &str, page: u32) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(SOURCE_KEY.to_string(), source.to_string());
        metadata.insert(PAGE_KEY.to_string(), page.to_string());
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A contiguous span of document text; the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text
    pub text: String,
    /// Metadata inherited from the page segment
    pub source_metadata: HashMap<String, String>,
    /// Position of this chunk within the document, contiguous from 0
    pub sequence_index: usize,
}

impl Chunk {
    /// Create a chunk that inherits `metadata`
    pub fn new(
        text: impl Into<String>,
        metadata: HashMap<String, String>,
        sequence_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            source_metadata: metadata,
            sequence_index,
        }
    }

    /// Source label, or "Unknown" when none was recorded
    pub fn source_label(&self) -> &str {
        self.source_metadata
            .get(SOURCE_KEY)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SOURCE)
    }

    /// Page number, if recorded
    pub fn page(&self) -> Option<u32> {
        self.source_metadata.get(PAGE_KEY)?.parse().ok()
    }
}

/// Sidecar record kept next to the stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Original upload filename, used as the chunks' source label
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            size,
            uploaded_at: Utc::now(),
        }
    }
}

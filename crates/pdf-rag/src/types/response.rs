//! Response payloads

use serde::{Deserialize, Serialize};

/// Message returned after a successful upload
pub const UPLOAD_OK: &str = "PDF uploaded and indexed";

/// Answer to a question together with where the context came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Generated answer text, returned as produced
    pub answer: String,
    /// Source label of each retrieved chunk, in retrieval order
    pub sources: Vec<String>,
}

/// Body of a successful `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

impl Default for UploadResponse {
    fn default() -> Self {
        Self {
            message: UPLOAD_OK.to_string(),
        }
    }
}

/// Snapshot reported by `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether a retrievable index is published
    pub indexed: bool,
    /// Publish counter; 0 means nothing was ever published
    pub generation: u64,
    /// Number of chunks in the published index
    pub chunks: usize,
    /// Source label of the indexed document
    pub document: Option<String>,
}

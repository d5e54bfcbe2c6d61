//! Error types for the PDF question-answering service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pdf-rag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned when an upload could not be indexed
pub const INDEX_BUILD_DETAIL: &str = "Failed to process PDF";

/// Message returned when answering a question failed
pub const GENERATION_DETAIL: &str = "Answer generation failed";

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Bad user input (non-PDF upload, empty question, missing file part)
    #[error("{0}")]
    InvalidInput(String),

    /// A question was asked before any document was indexed
    #[error("No PDF indexed yet. Upload a PDF first.")]
    NoIndex,

    /// Loading, splitting, embedding or persisting a document failed
    #[error("Index build failed: {0}")]
    IndexBuild(String),

    /// The generation backend failed (timeout, refused connection, bad payload)
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Embedding backend error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// The document could not be read or contained no text
    #[error("Failed to load document: {0}")]
    DocumentLoad(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a document load error
    pub fn document_load(message: impl Into<String>) -> Self {
        Self::DocumentLoad(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Fold any failure raised while rebuilding the index into `IndexBuild`
    pub fn into_index_build(self) -> Self {
        match self {
            Self::IndexBuild(_) => self,
            other => Self::IndexBuild(other.to_string()),
        }
    }

    /// Fold answer-time failures into `Generation`, keeping the client errors
    pub fn into_answer_failure(self) -> Self {
        match self {
            Self::InvalidInput(_) | Self::NoIndex | Self::Generation(_) => self,
            other => Self::Generation(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NoIndex => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::IndexBuild(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INDEX_BUILD_DETAIL.to_string(),
            ),
            Error::Generation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_DETAIL.to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        // Internal detail stays in the log
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

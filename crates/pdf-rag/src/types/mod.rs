//! Core types for the service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, PageSegment, StoredDocument, PAGE_KEY, SOURCE_KEY, UNKNOWN_SOURCE};
pub use query::{validate_question, AskRequest, EMPTY_QUESTION};
pub use response::{QueryResult, StatusResponse, UploadResponse, UPLOAD_OK};

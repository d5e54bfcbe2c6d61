//! Vector index and retrieval

pub mod index;
pub mod retriever;

pub use index::{cosine_similarity, IndexEntry, ScoredChunk, VectorIndex, INDEX_FILE};
pub use retriever::Retriever;

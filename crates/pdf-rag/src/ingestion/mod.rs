//! Document ingestion: storage, semantic chunking and index rebuilds

mod builder;
mod document_slot;
mod splitter;

pub use builder::ChunkStoreBuilder;
pub use document_slot::DocumentSlot;
pub use splitter::SemanticChunker;

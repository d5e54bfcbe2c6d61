//! # pdf-rag
//!
//! Question answering over a single uploaded PDF.
//!
//! An upload replaces the active document, which is split into semantically
//! coherent chunks, embedded and indexed. Questions retrieve the closest
//! chunks, which are rendered into a fixed "answer only from context" prompt
//! for a local LLM. Answers come back with the source label of every chunk
//! that was used.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pdf_rag::{Providers, RagConfig, RagServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RagConfig::default();
//!     let providers = Providers::from_config(&config)?;
//!     let server = RagServer::new(config, providers);
//!     server.prime().await;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod lifecycle;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use lifecycle::IndexLifecycle;
pub use providers::Providers;
pub use server::RagServer;
pub use types::{Chunk, PageSegment, QueryResult};

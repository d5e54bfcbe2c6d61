//! Prompt construction and answer generation

pub mod pipeline;
pub mod prompt;

pub use pipeline::AnswerPipeline;
pub use prompt::{build_context, PromptTemplate, QA_TEMPLATE};

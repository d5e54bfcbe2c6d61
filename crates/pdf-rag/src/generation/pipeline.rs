//! Retrieve, prompt and generate

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::retrieval::Retriever;
use crate::types::{validate_question, Chunk, QueryResult};

use super::prompt::{build_context, PromptTemplate};

/// Question answering over one retriever
pub struct AnswerPipeline {
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
    template: PromptTemplate,
}

impl AnswerPipeline {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmProvider>, template: PromptTemplate) -> Self {
        Self {
            retriever,
            llm,
            template,
        }
    }

    /// Answer `question` from the retrieved context
    ///
    /// Blank questions are rejected before any backend is called. The
    /// generator is called exactly once, even when nothing was retrieved.
    pub async fn answer(&self, question: &str) -> Result<QueryResult> {
        validate_question(question)?;

        let chunks = self.retriever.retrieve(question).await?;
        let context = build_context(&chunks);
        let prompt = self.template.render(&context, question);

        tracing::info!(
            "Answering with {} chunks via {}",
            chunks.len(),
            self.llm.name()
        );

        let answer = self.llm.generate(&prompt).await?;

        Ok(QueryResult {
            answer,
            sources: sources_of(&chunks),
        })
    }
}

fn sources_of(chunks: &[Chunk]) -> Vec<String> {
    chunks
        .iter()
        .map(|chunk| chunk.source_label().to_string())
        .collect()
}

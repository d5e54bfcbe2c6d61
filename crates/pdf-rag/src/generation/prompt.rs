//! Prompt template for grounded question answering

use crate::types::Chunk;

/// Answer-only-from-context instructions with `{context}` and `{question}` slots
pub const QA_TEMPLATE: &str = r#"You are an expert. Answer using only the context.
If not found, say: "The information is not available in the provided context."

Context: {context}
Question: {question}
Answer:"#;

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// Separator placed between retrieved chunks in the context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Prompt template with `{context}` and `{question}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(QA_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Fill the placeholders
    ///
    /// Only placeholders in the template are replaced; braces inside the
    /// substituted context or question are copied through untouched.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + context.len() + question.len());
        let mut rest = self.text.as_str();

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(QUESTION_SLOT) {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        out
    }
}

/// Concatenate chunk texts in retrieval order
pub fn build_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

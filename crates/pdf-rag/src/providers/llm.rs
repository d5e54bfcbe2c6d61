//! Generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-to-text generation
///
/// Implementations:
/// - `OpenAiCompatibleLlm`: chat completions (LM Studio by default)
/// - `OllamaLlm`: Ollama `/api/generate`
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

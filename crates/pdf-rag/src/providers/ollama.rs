//! Ollama-based providers for embeddings and generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama API client; only embedding calls are retried
pub struct OllamaClient {
    client: Client,
    base_url: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a client whose requests time out after `timeout_secs`
    pub fn new(base_url: &str, timeout_secs: u64, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt < self.max_retries {
                        let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}): {}; retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::embedding("no attempt was made")))
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Embed a batch of texts with `model` in one request
    pub async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let url = url.as_str();
        let client = &self.client;

        self.retry_request(move || async move {
            let response = client
                .post(url)
                .json(&EmbedRequest { model, input: texts })
                .send()
                .await
                .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::embedding(format!("HTTP {} - {}", status, body)));
            }

            let parsed: EmbedResponse = response.json().await.map_err(|e| {
                Error::embedding(format!("Failed to parse embedding response: {}", e))
            })?;

            if parsed.embeddings.len() != texts.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    parsed.embeddings.len()
                )));
            }

            Ok(parsed.embeddings)
        })
        .await
    }

    /// Single non-streaming completion, never retried
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        num_predict: u32,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse generation response: {}", e)))?;

        Ok(parsed.response)
    }
}

/// Ollama embedding provider (all-minilm by default)
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(&config.base_url, config.timeout_secs, config.max_retries)?,
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.client.embed(&self.model, &[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::embedding("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.client.embed(&self.model, batch).await?);
        }
        tracing::debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Ollama generation provider
pub struct OllamaLlm {
    client: OllamaClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaLlm {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(&config.base_url, config.timeout_secs, 0)?,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::info!("Generating answer with Ollama model: {}", self.model);
        self.client
            .generate(&self.model, prompt, self.temperature, self.max_tokens)
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

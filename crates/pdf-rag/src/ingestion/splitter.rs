//! Embedding-driven semantic chunking
//!
//! Sentences are grouped into windows, consecutive windows are compared by
//! cosine distance, and a chunk boundary is placed wherever the distance is
//! an outlier for its page.

use async_trait::async_trait;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::{Chunker, EmbeddingProvider};
use crate::retrieval::cosine_similarity;
use crate::types::{Chunk, PageSegment};

/// Splits each page where the topic shifts
pub struct SemanticChunker {
    embedder: Arc<dyn EmbeddingProvider>,
    /// Neighbours on each side folded into a sentence's window
    buffer_size: usize,
    /// Distances strictly above this percentile start a new chunk
    breakpoint_percentile: f64,
}

impl SemanticChunker {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: &ChunkingConfig) -> Self {
        Self {
            embedder,
            buffer_size: config.buffer_size,
            breakpoint_percentile: config.breakpoint_percentile,
        }
    }

    /// Group one segment's sentences into chunk texts
    async fn split_segment(&self, text: &str) -> Result<Vec<String>> {
        let sentences = split_sentences(text);
        if sentences.len() <= 1 {
            return Ok(sentences.into_iter().map(str::to_string).collect());
        }

        let windows = build_windows(&sentences, self.buffer_size);
        let embeddings = self.embedder.embed_batch(&windows).await?;

        let distances: Vec<f64> = embeddings
            .windows(2)
            .map(|pair| 1.0 - f64::from(cosine_similarity(&pair[0], &pair[1])))
            .collect();
        let threshold = percentile(&distances, self.breakpoint_percentile);

        let mut groups = Vec::new();
        let mut start = 0;
        for (i, distance) in distances.iter().enumerate() {
            if *distance > threshold {
                groups.push(sentences[start..=i].join(" "));
                start = i + 1;
            }
        }
        groups.push(sentences[start..].join(" "));

        Ok(groups)
    }
}

#[async_trait]
impl Chunker for SemanticChunker {
    async fn split(&self, segments: &[PageSegment]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for segment in segments {
            for text in self.split_segment(&segment.text).await? {
                let sequence_index = chunks.len();
                chunks.push(Chunk::new(text, segment.metadata.clone(), sequence_index));
            }
        }

        tracing::info!(
            "Split {} segments into {} chunks",
            segments.len(),
            chunks.len()
        );
        Ok(chunks)
    }
}

/// Unicode sentences, trimmed, blanks dropped
fn split_sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// For each sentence, the sentence joined with up to `buffer` neighbours per side
fn build_windows(sentences: &[&str], buffer: usize) -> Vec<String> {
    (0..sentences.len())
        .map(|i| {
            let lo = i.saturating_sub(buffer);
            let hi = (i + buffer).min(sentences.len() - 1);
            sentences[lo..=hi].join(" ")
        })
        .collect()
}

/// Percentile with linear interpolation between closest ranks
fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

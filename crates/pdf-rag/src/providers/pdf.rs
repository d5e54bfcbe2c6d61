//! PDF document loader
//!
//! Text is pulled page by page with lopdf so every segment knows its page.
//! Documents lopdf cannot read (or that yield no text that way) get a second
//! chance through pdf-extract, which returns the whole document as page 1.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::PageSegment;

use super::loader::DocumentLoader;

/// Loads PDFs from disk on the blocking thread pool
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    /// Extract page segments from in-memory PDF bytes
    pub fn extract(data: &[u8], source: &str) -> Result<Vec<PageSegment>> {
        if data.is_empty() {
            return Err(Error::document_load("document is empty"));
        }

        match Self::extract_pages(data, source) {
            Ok(segments) if !segments.is_empty() => return Ok(segments),
            Ok(_) => tracing::warn!(
                "No text found page by page in {}, trying whole-document extraction",
                source
            ),
            Err(e) => tracing::warn!(
                "Page extraction failed for {}: {}, trying whole-document extraction",
                source,
                e
            ),
        }

        // pdf-extract panics on some malformed fonts
        let text = without_panics(source, || pdf_extract::extract_text_from_mem(data))?
            .map_err(|e| Error::document_load(format!("{}: {}", source, e)))?;
        let text = clean_text(&text);

        if text.is_empty() {
            return Err(Error::document_load(format!(
                "{}: no extractable text (image-only or encrypted PDF?)",
                source
            )));
        }

        Ok(vec![PageSegment::new(text, source, 1)])
    }

    fn extract_pages(data: &[u8], source: &str) -> Result<Vec<PageSegment>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::document_load(format!("Failed to load PDF: {}", e)))?;

        let mut segments = Vec::new();
        for page_number in doc.get_pages().into_keys() {
            match doc.extract_text(&[page_number]) {
                Ok(raw) => {
                    let text = clean_text(&raw);
                    if !text.is_empty() {
                        segments.push(PageSegment::new(text, source, page_number));
                    }
                }
                Err(e) => tracing::debug!("Could not extract page {}: {}", page_number, e),
            }
        }

        Ok(segments)
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, path: &Path, source: &str) -> Result<Vec<PageSegment>> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::document_load(format!("{}: {}", path.display(), e)))?;
        let source = source.to_string();

        let segments = tokio::task::spawn_blocking(move || Self::extract(&data, &source))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::info!("Loaded {} pages from {}", segments.len(), path.display());
        Ok(segments)
    }
}

/// Run `f`, turning a panic into a load error; relies on `panic = "unwind"`
fn without_panics<T>(source: &str, f: impl FnOnce() -> T) -> Result<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f))
        .map_err(|_| Error::document_load(format!("{}: PDF extraction panicked", source)))
}

/// Drop NUL bytes, trim lines and remove blank ones
fn clean_text(raw: &str) -> String {
    raw.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

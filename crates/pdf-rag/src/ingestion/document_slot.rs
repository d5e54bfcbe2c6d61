//! Single-slot document storage with a metadata sidecar

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::StoredDocument;

/// The one active document; each upload overwrites it
#[derive(Debug, Clone)]
pub struct DocumentSlot {
    path: PathBuf,
}

impl DocumentSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<document>.meta.json`
    pub fn meta_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".meta.json");
        PathBuf::from(name)
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Overwrite the slot with `data` and record its original filename
    pub async fn store(&self, data: &[u8], filename: &str) -> Result<StoredDocument> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, data).await?;

        let record = StoredDocument::new(filename, data.len() as u64);
        tokio::fs::write(self.meta_path(), serde_json::to_vec_pretty(&record)?).await?;

        tracing::info!(
            "Stored {} ({} bytes) at {}",
            filename,
            data.len(),
            self.path.display()
        );
        Ok(record)
    }

    /// Sidecar record, if one was written and is readable
    pub async fn metadata(&self) -> Option<StoredDocument> {
        let data = tokio::fs::read(self.meta_path()).await.ok()?;
        match serde_json::from_slice(&data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", self.meta_path().display(), e);
                None
            }
        }
    }

    /// Label for chunks of the stored document: the upload filename, else the slot's file name
    pub async fn label(&self) -> String {
        match self.metadata().await {
            Some(record) => record.filename,
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string()),
        }
    }
}

//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    response::Result,
    Json,
};
use std::path::Path;

use crate::error::Error;
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// POST /upload - store a PDF as the active document and index it
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .and_then(|name| Path::new(name).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !is_pdf(&filename) {
            tracing::debug!("Rejected upload {:?}: not a PDF", filename);
            return Err(Error::invalid_input("Only PDF files allowed").into());
        }

        let data = field.bytes().await?;
        tracing::info!("Received {} ({} bytes)", filename, data.len());

        state.lifecycle().upload(&data, &filename).await?;

        return Ok(Json(UploadResponse::default()));
    }

    tracing::debug!("Rejected upload without a file part");
    Err(Error::invalid_input("No file uploaded").into())
}

/// Case-insensitive `.pdf` extension check
pub fn is_pdf(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

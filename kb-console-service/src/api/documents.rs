//! Document upload endpoint.
//!
//! Receives a multipart upload, runs the ingestion dispatcher on it, and
//! forwards the extracted text to the knowledge base.

use axum::{Json, extract::{Multipart, State}};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ServiceError;
use crate::extract::{UploadedDocument, extract};

use super::AppState;

/// Response for a successful upload
#[derive(Serialize)]
pub struct UploadResponse {
    pub filename: String,
    /// Number of characters forwarded to the knowledge base.
    pub characters: usize,
    /// Leading slice of the extracted text, for the UI preview.
    pub preview: String,
}

const PREVIEW_CHARS: usize = 200;

/// Upload a document, extract its text, and update the knowledge base
pub async fn upload_document_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServiceError> {
    let mut document: Option<UploadedDocument> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("document").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ServiceError::InvalidRequest {
                    message: e.to_string(),
                })?;
            document = Some(UploadedDocument::new(filename, data.to_vec()));
        }
    }

    let document = document.ok_or_else(|| ServiceError::InvalidRequest {
        message: "missing \"file\" field in multipart upload".to_string(),
    })?;

    info!(
        filename = %document.name,
        bytes = document.bytes.len(),
        "Processing uploaded document"
    );

    let text = extract(&document)?;

    state
        .kb_client
        .update_knowledge(&text, &document.name)
        .await?;

    let characters = text.chars().count();
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();

    info!(filename = %document.name, characters, "Document ingested into knowledge base");

    Ok(Json(UploadResponse {
        filename: document.name,
        characters,
        preview,
    }))
}

//! Client for the external knowledge-base service.
//!
//! The backend is an opaque collaborator reached over HTTP: one endpoint
//! ingests extracted document text, the other answers natural-language
//! queries against it. Calls are single-shot; there is no retry logic.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::BackendError;

/// Knowledge-base API client
pub struct KnowledgeBaseClient {
    client: Client,
    config: BackendConfig,
}

#[derive(Serialize)]
struct UpdateKnowledgeRequest<'a> {
    content: &'a str,
    filename: &'a str,
}

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    response: String,
}

impl KnowledgeBaseClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::Unavailable {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { client, config })
    }

    /// Push extracted document text into the knowledge base.
    pub async fn update_knowledge(
        &self,
        content: &str,
        filename: &str,
    ) -> Result<(), BackendError> {
        let url = format!("{}/admin/update-knowledge", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&UpdateKnowledgeRequest { content, filename })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message_from_body(&body);
            warn!(status = status.as_u16(), message = %message, "Knowledge base update rejected");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(filename = %filename, characters = content.chars().count(), "Knowledge base updated");
        Ok(())
    }

    /// Ask the retrieval endpoint a question about the ingested documents.
    pub async fn retrieve(&self, query: &str) -> Result<String, BackendError> {
        let url = format!("{}/retrieve/", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&RetrieveRequest { query })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message_from_body(&body);
            warn!(status = status.as_u16(), message = %message, "Retrieval request rejected");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: RetrieveResponse =
            response
                .json()
                .await
                .map_err(|e| BackendError::InvalidResponse {
                    message: e.to_string(),
                })?;

        Ok(body.response)
    }
}

/// Pull the most specific error message out of a backend error body.
///
/// Bodies may be `{"detail": {"message": ...}}`, any other JSON, or plain
/// text; preference goes to `detail.message`, then the whole `detail`
/// value, then the JSON itself, then the raw body.
fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            if let Some(detail) = value.get("detail") {
                if let Some(message) = detail.get("message").and_then(|m| m.as_str()) {
                    return message.to_string();
                }
                return detail.to_string();
            }
            value.to_string()
        }
        Err(_) => body.to_string(),
    }
}

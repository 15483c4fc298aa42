//! Upload client for the zero-knowledge text hosting API.
//!
//! A transport adapter only: it receives bytes that are already encrypted and
//! returns the content id the service assigns. No retries are attempted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::types::config::SecureQrConfig;
use crate::types::errors::UploadError;
use crate::types::payload::{UploadPayload, UploadResponse};
use crate::types::secure_qr::Expiration;

/// Trait for the hosting collaborator that stores encrypted blobs.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Sends one payload and returns the content id (e.g. `text_abc123`).
    async fn upload(&self, payload: &UploadPayload) -> Result<String, UploadError>;

    /// Builds the payload from its parts, then uploads it.
    async fn upload_text(
        &self,
        encrypted_name_hex: &str,
        salt: &[u8],
        encrypted_text: &[u8],
        expiration: Expiration,
        downloads: u32,
    ) -> Result<String, UploadError> {
        let payload = UploadPayload::new(
            encrypted_name_hex,
            salt,
            encrypted_text.to_vec(),
            expiration,
            downloads,
        );
        self.upload(&payload).await
    }
}

/// HTTP client for the `POST /api/send/text` route.
pub struct YeetFileClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl YeetFileClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Uses a caller-built client; `timeout` should match the one it was built with.
    pub fn with_client(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SecureQrConfig) -> Result<Self, UploadError> {
        Self::new(config.upload_endpoint.clone(), config.upload_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> UploadError {
        if err.is_timeout() {
            UploadError::Timeout(self.timeout)
        } else {
            UploadError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Uploader for YeetFileClient {
    async fn upload(&self, payload: &UploadPayload) -> Result<String, UploadError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            size = payload.size,
            expiration = %payload.expiration,
            downloads = payload.downloads,
            "uploading encrypted text"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(status = status.as_u16(), "upload rejected");
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        match parsed.id {
            Some(id) if !id.is_empty() => {
                tracing::info!(id = %id, "encrypted text uploaded");
                Ok(id)
            }
            _ => Err(UploadError::MissingId),
        }
    }
}

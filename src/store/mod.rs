//! Blob store access.
//!
//! # Responsibilities
//! - Define the capability the blob proxy needs: fetch bytes for a key and
//!   report a content type, or not-found
//! - Drain object payloads fully into memory, bounded by a size cap
//!
//! # Design Decisions
//! - `BlobStore` is a trait object seam so tests inject fakes
//! - Transport details (TLS, request signing) belong to the store gateway
//!   behind the endpoint, not to this crate
//! - Error variants stay fine-grained for logging even though the edge
//!   collapses them all into one caller-visible 404

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::BlobConfig;
use crate::resilience::{send_with_deadline, FetchError};

/// Content type assumed when the store reports none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Failure of a store fetch.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,

    #[error("store denied access ({0})")]
    Denied(StatusCode),

    #[error("store returned unexpected status {0}")]
    Failed(StatusCode),

    #[error("object exceeds the {limit}-byte cap")]
    TooLarge { limit: usize },

    #[error("store unreachable: {0}")]
    Unreachable(#[from] FetchError),
}

/// An object fetched from the store.
#[derive(Debug, Clone)]
pub struct BlobRecord {
    pub bytes: Bytes,
    pub content_type: String,
}

impl BlobRecord {
    /// Text/binary classification: text when the content type starts with
    /// `text/` or mentions `xml` or `json`; binary otherwise.
    pub fn is_text(&self) -> bool {
        let ct = &self.content_type;
        ct.starts_with("text/") || ct.contains("xml") || ct.contains("json")
    }
}

/// Capability to fetch bytes for a key from a content store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<BlobRecord, StoreError>;
}

/// Blob store speaking authenticated HTTP GET against a store gateway.
///
/// Objects live at `{endpoint}/{bucket}/{key}`; the gateway owns signing
/// and TLS. Payloads are drained chunk by chunk and refused once they pass
/// the configured cap.
pub struct HttpBlobStore {
    client: reqwest::Client,
    config: BlobConfig,
    deadline: Duration,
}

impl HttpBlobStore {
    pub fn new(client: reqwest::Client, config: BlobConfig, deadline: Duration) -> Self {
        Self {
            client,
            config,
            deadline,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            key
        )
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn fetch(&self, key: &str) -> Result<BlobRecord, StoreError> {
        let mut request = self.client.get(self.object_url(key));
        if let Some(token) = &self.config.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let mut response = send_with_deadline(request, self.deadline).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(StoreError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(StoreError::Denied(response.status()))
            }
            status => return Err(StoreError::Failed(status)),
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        // Drain to completion; partial payloads are never forwarded. The
        // per-request timer from send_with_deadline bounds the whole drain,
        // so a trickling body cannot hold the request open.
        let limit = self.config.max_object_bytes;
        let mut buf = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|error| FetchError::from_body_read(error, self.deadline))?
        {
            if buf.len() + chunk.len() > limit {
                return Err(StoreError::TooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(BlobRecord {
            bytes: buf.freeze(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content_type: &str) -> BlobRecord {
        BlobRecord {
            bytes: Bytes::new(),
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn text_prefix_classifies_as_text() {
        assert!(record("text/html; charset=utf-8").is_text());
        assert!(record("text/plain").is_text());
    }

    #[test]
    fn xml_and_json_classify_as_text() {
        assert!(record("application/json").is_text());
        assert!(record("application/xml").is_text());
        assert!(record("image/svg+xml").is_text());
    }

    #[test]
    fn everything_else_is_binary() {
        assert!(!record("image/png").is_text());
        assert!(!record("application/octet-stream").is_text());
        assert!(!record("font/woff2").is_text());
    }

    #[test]
    fn object_url_joins_endpoint_bucket_key() {
        let store = HttpBlobStore::new(
            reqwest::Client::new(),
            BlobConfig {
                endpoint: "https://store.example.com/".into(),
                bucket: "assets".into(),
                ..BlobConfig::default()
            },
            Duration::from_secs(1),
        );
        assert_eq!(
            store.object_url("img/logo.png"),
            "https://store.example.com/assets/img/logo.png"
        );
    }
}

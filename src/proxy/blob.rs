//! Blob proxy.
//!
//! # Responsibilities
//! - Map the public asset path to a storage key
//! - Fetch the object through the store capability and drain it fully
//! - Classify text vs binary and encode the body accordingly
//! - Mark responses immutable: keys are content-addressed, bytes never change
//!
//! # Design Decisions
//! - An empty key is the caller's error (400), not a store failure
//! - Every store-level failure (missing, denied, unreachable, over the size
//!   cap) collapses into one caller-visible 404; the real reason is logged

use std::sync::Arc;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};

use crate::http::request::InboundRequest;
use crate::http::response::{OutboundResponse, ResponseBody};
use crate::routing::ASSETS_PREFIX;
use crate::store::BlobStore;

/// Cache directive for served objects: a week, immutable.
const ASSET_CACHE_CONTROL: &str = "public, max-age=604800, immutable";

/// Stateless proxy over the blob store capability.
pub struct BlobProxy {
    store: Arc<dyn BlobStore>,
}

impl BlobProxy {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, req: InboundRequest) -> OutboundResponse {
        let key = ASSETS_PREFIX.strip(&req.path);
        if key.is_empty() {
            return OutboundResponse::text(StatusCode::BAD_REQUEST, "Missing key");
        }

        let record = match self.store.fetch(key).await {
            Ok(record) => record,
            Err(error) => {
                tracing::error!(key = %key, error = %error, "Blob fetch failed");
                return OutboundResponse::text(StatusCode::NOT_FOUND, "Not found");
            }
        };

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&record.content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(ASSET_CACHE_CONTROL));

        let is_text = record.is_text();
        OutboundResponse {
            status: StatusCode::OK,
            headers,
            body: ResponseBody::from_bytes(&record.bytes, is_text),
        }
    }
}

//! Render proxy.
//!
//! # Responsibilities
//! - Map the public page path to a logical resource identifier
//! - Ask the single rendering backend for HTML
//! - Attach a stale-while-revalidate cache directive to successful renders
//!
//! # Design Decisions
//! - Single upstream, no failover: a failed render surfaces its status
//!   verbatim with a short diagnostic body
//! - The upstream error body is logged for diagnosis, never forwarded
//! - An empty remainder renders the sentinel "index" resource

use std::time::Duration;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use serde_json::json;

use crate::config::RenderConfig;
use crate::http::request::InboundRequest;
use crate::http::response::OutboundResponse;
use crate::resilience::send_with_deadline;
use crate::routing::PAGE_PREFIX;

/// Cache directive for rendered pages: a front cache may serve the page for
/// a day and keep serving it stale for another day while revalidating in
/// the background.
const PAGE_CACHE_CONTROL: &str = "public, s-maxage=86400, stale-while-revalidate=86400";

/// Stateless proxy for the rendering backend.
pub struct RenderProxy {
    client: reqwest::Client,
    config: RenderConfig,
    deadline: Duration,
}

impl RenderProxy {
    pub fn new(client: reqwest::Client, config: RenderConfig, deadline: Duration) -> Self {
        Self {
            client,
            config,
            deadline,
        }
    }

    pub async fn handle(&self, req: InboundRequest) -> OutboundResponse {
        let mut path = PAGE_PREFIX.strip(&req.path).to_string();
        if path.is_empty() {
            path = "index".to_string();
        }

        let url = format!(
            "{}/functions/v1/render",
            self.config.base_url.trim_end_matches('/')
        );
        let mut request = self
            .client
            .post(&url)
            .json(&json!({ "path": path, "site_id": self.config.site_id }));
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match send_with_deadline(request, self.deadline).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(path = %path, error = %error, "Render call failed");
                return OutboundResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            let upstream_body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                upstream_body = %upstream_body,
                "Render backend rejected request"
            );
            return OutboundResponse::text(status, format!("Render failed: {}", status.as_u16()));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(error) => {
                tracing::error!(path = %path, error = %error, "Failed to read rendered page");
                return OutboundResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };

        OutboundResponse::text(StatusCode::OK, html)
            .with_header(CONTENT_TYPE, "text/html; charset=utf-8")
            .with_header(CACHE_CONTROL, PAGE_CACHE_CONTROL)
    }
}

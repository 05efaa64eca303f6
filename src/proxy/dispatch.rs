//! Dispatch trigger.
//!
//! # Responsibilities
//! - Validate the dispatch credential before touching the network
//! - Fire a one-shot repository-dispatch event at the configured endpoint
//!
//! # Design Decisions
//! - A missing token fails fast with 500; no unauthenticated call is ever
//!   attempted
//! - Non-2xx answers pass the upstream status and error text through

use std::time::Duration;

use axum::http::header::ACCEPT;
use axum::http::StatusCode;
use serde_json::json;

use crate::config::DispatchConfig;
use crate::http::response::OutboundResponse;
use crate::resilience::send_with_deadline;

/// One-shot trigger for an external repository-dispatch event.
pub struct DispatchTrigger {
    client: reqwest::Client,
    config: DispatchConfig,
    deadline: Duration,
}

impl DispatchTrigger {
    pub fn new(client: reqwest::Client, config: DispatchConfig, deadline: Duration) -> Self {
        Self {
            client,
            config,
            deadline,
        }
    }

    pub async fn handle(&self) -> OutboundResponse {
        let Some(token) = &self.config.token else {
            tracing::error!("Dispatch token not configured");
            return OutboundResponse::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Dispatch token not configured",
            );
        };

        let url = format!(
            "{}/repos/{}/dispatches",
            self.config.api_base.trim_end_matches('/'),
            self.config.repository
        );
        tracing::info!(repository = %self.config.repository, event_type = %self.config.event_type, "Triggering dispatch");

        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/vnd.github+json")
            .json(&json!({ "event_type": self.config.event_type }));

        let response = match send_with_deadline(request, self.deadline).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(error = %error, "Dispatch call failed");
                return OutboundResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error_text = %error_text, "Dispatch rejected");
            return OutboundResponse::text(status, format!("Dispatch failed: {error_text}"));
        }

        tracing::info!("Dispatch triggered");
        OutboundResponse::text(StatusCode::OK, "Dispatch triggered")
    }
}

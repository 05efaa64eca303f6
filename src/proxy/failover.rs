//! Failover proxy.
//!
//! # Responsibilities
//! - Build the ordered candidate list (primary when configured, then the
//!   fallback) for the logical subpath
//! - Attempt candidates strictly in sequence, each bounded by a deadline
//! - Return the first 2xx response verbatim, or the terminal candidate's
//!   outcome when the chain is exhausted
//!
//! # Design Decisions
//! - A reachable upstream answering non-2xx triggers failover the same as a
//!   transport failure; only the terminal candidate's answer is returned
//!   as-is
//! - The terminal-candidate rule is an explicit branch, not a fallthrough
//! - Candidates are never contacted in parallel, so a slow-but-working
//!   primary does not amplify load on the fallback

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;

use crate::config::FailoverConfig;
use crate::http::request::{bodyless, InboundRequest};
use crate::http::response::OutboundResponse;
use crate::resilience::{send_with_deadline, FetchError};
use crate::routing::API_PREFIX;

/// Content type assumed for outbound requests when the caller sent none.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A resolved upstream candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// Position in the chain; "primary" or "fallback" in logs.
    pub name: &'static str,
    pub url: String,
    pub bearer_token: Option<String>,
}

/// Outcome of one candidate attempt. Only `Delivered` short-circuits the
/// chain; the other two fail over unless the candidate is terminal.
enum AttemptOutcome {
    /// Upstream answered 2xx.
    Delivered(OutboundResponse),
    /// Upstream reachable but answered non-2xx.
    Rejected(OutboundResponse),
    /// Transport failure or deadline expiry; no response to pass through.
    Unreachable(FetchError),
}

/// Stateless failover proxy over an ordered upstream chain.
pub struct FailoverProxy {
    client: reqwest::Client,
    config: FailoverConfig,
    deadline: Duration,
}

impl FailoverProxy {
    pub fn new(client: reqwest::Client, config: FailoverConfig, deadline: Duration) -> Self {
        Self {
            client,
            config,
            deadline,
        }
    }

    /// Deliver a request through the chain. Never fails: every path ends in
    /// a well-formed response.
    pub async fn handle(&self, req: InboundRequest) -> OutboundResponse {
        let subpath = API_PREFIX.strip(&req.path).to_string();
        let targets = self.candidates(&subpath);
        let last = targets.len().saturating_sub(1);

        for (index, target) in targets.iter().enumerate() {
            let terminal = index == last;
            tracing::debug!(
                target = target.name,
                url = %target.url,
                subpath = %subpath,
                "Trying upstream"
            );

            match self.attempt(target, &req).await {
                AttemptOutcome::Delivered(response) => {
                    tracing::debug!(
                        target = target.name,
                        status = %response.status,
                        "Upstream delivered"
                    );
                    return response;
                }
                AttemptOutcome::Rejected(response) if terminal => {
                    tracing::warn!(
                        target = target.name,
                        status = %response.status,
                        "Terminal upstream rejected; returning its response verbatim"
                    );
                    return response;
                }
                AttemptOutcome::Rejected(response) => {
                    tracing::warn!(
                        target = target.name,
                        status = %response.status,
                        "Upstream rejected; failing over"
                    );
                }
                AttemptOutcome::Unreachable(error) if terminal => {
                    tracing::error!(
                        target = target.name,
                        error = %error,
                        subpath = %subpath,
                        "All upstreams exhausted"
                    );
                    return unavailable();
                }
                AttemptOutcome::Unreachable(error) => {
                    tracing::warn!(
                        target = target.name,
                        error = %error,
                        "Upstream unreachable; failing over"
                    );
                }
            }
        }

        tracing::error!(subpath = %subpath, "No upstream targets configured");
        unavailable()
    }

    /// Ordered candidate list for a subpath. The primary joins the chain
    /// only when its base URL is configured; its absence is not an error.
    fn candidates(&self, subpath: &str) -> Vec<UpstreamTarget> {
        let mut targets = Vec::with_capacity(2);
        if let Some(base) = &self.config.primary_base_url {
            targets.push(UpstreamTarget {
                name: "primary",
                url: join_api(base, subpath),
                bearer_token: self.config.primary_bearer_token.clone(),
            });
        }
        if !self.config.fallback_base_url.is_empty() {
            targets.push(UpstreamTarget {
                name: "fallback",
                url: join_api(&self.config.fallback_base_url, subpath),
                bearer_token: self.config.fallback_bearer_token.clone(),
            });
        }
        targets
    }

    /// One bounded attempt against one candidate.
    async fn attempt(&self, target: &UpstreamTarget, req: &InboundRequest) -> AttemptOutcome {
        let mut request = self
            .client
            .request(req.method.clone(), &target.url)
            .header(
                CONTENT_TYPE,
                req.content_type().unwrap_or(DEFAULT_CONTENT_TYPE),
            );
        if let Some(token) = &target.bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if !bodyless(&req.method) {
            if let Some(body) = &req.body {
                request = request.body(body.clone());
            }
        }

        let response = match send_with_deadline(request, self.deadline).await {
            Ok(response) => response,
            Err(error) => return AttemptOutcome::Unreachable(error),
        };

        let status = response.status();
        let headers = response.headers().clone();
        // The per-request timer from send_with_deadline still bounds this
        // read; a body that stalls mid-stream aborts the attempt instead of
        // blocking the chain.
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                return AttemptOutcome::Unreachable(FetchError::from_body_read(
                    error,
                    self.deadline,
                ))
            }
        };

        let outbound = OutboundResponse::from_upstream(status, headers, body);
        if status.is_success() {
            AttemptOutcome::Delivered(outbound)
        } else {
            AttemptOutcome::Rejected(outbound)
        }
    }
}

/// Uniform exhausted-chain response.
fn unavailable() -> OutboundResponse {
    OutboundResponse::text(
        StatusCode::SERVICE_UNAVAILABLE,
        "Service temporarily unavailable",
    )
}

fn join_api(base: &str, subpath: &str) -> String {
    format!("{}/api/{}", base.trim_end_matches('/'), subpath)
}

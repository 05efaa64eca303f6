//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits; the struct is built from the environment by
//! `loader.rs` and injected into handler constructors, never read ad hoc.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Failover proxy targets and credentials.
    pub failover: FailoverConfig,

    /// Render proxy backend.
    pub render: RenderConfig,

    /// Blob store access.
    pub blob: BlobConfig,

    /// Dispatch trigger endpoint.
    pub dispatch: DispatchConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Failover proxy configuration.
///
/// The primary target is optional; when its base URL is absent the chain
/// consists of the fallback alone. Each target carries its own optional
/// bearer token: the reference deployment puts the fallback's service-role
/// token on both targets, but the fields are independent so a deployment can
/// send the primary no credential at all.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Base URL of the primary origin, tried first when set.
    pub primary_base_url: Option<String>,

    /// Base URL of the fallback backend, always the terminal candidate.
    pub fallback_base_url: String,

    /// Bearer token attached to primary attempts.
    pub primary_bearer_token: Option<String>,

    /// Bearer token attached to fallback attempts.
    pub fallback_bearer_token: Option<String>,
}

/// Render proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base URL of the rendering backend; the render function lives at
    /// `{base}/functions/v1/render`.
    pub base_url: String,

    /// Bearer token for the rendering backend.
    pub bearer_token: Option<String>,

    /// Site identifier sent with every render request.
    pub site_id: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bearer_token: None,
            site_id: "main".to_string(),
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Store endpoint, e.g. "https://accountid.r2.cloudflarestorage.com".
    pub endpoint: String,

    /// Bucket objects are served from.
    pub bucket: String,

    /// Access token for the store endpoint.
    pub access_token: Option<String>,

    /// Upper bound on a drained object, in bytes. Objects over the cap are
    /// refused rather than buffered.
    pub max_object_bytes: usize,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bucket: String::new(),
            access_token: None,
            max_object_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Dispatch trigger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// API base of the event-dispatch service.
    pub api_base: String,

    /// Repository the event is dispatched to, as "owner/repo".
    pub repository: String,

    /// Event type sent in the dispatch payload.
    pub event_type: String,

    /// Bearer token; the trigger refuses to fire without one.
    pub token: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            repository: String::new(),
            event_type: "regenerate-sitemaps".to_string(),
            token: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a single upstream call, in milliseconds.
    pub upstream_ms: u64,

    /// Connect timeout for the shared outbound client, in milliseconds.
    pub connect_ms: u64,

    /// Whole-request timeout enforced by the server, in seconds. Must leave
    /// room for the failover chain to exhaust every candidate.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_ms: 5_000,
            connect_ms: 2_000,
            request_secs: 30,
        }
    }
}

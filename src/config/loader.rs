//! Configuration loading from the environment.
//!
//! The gateway is configured entirely through environment variables, read
//! once at startup into a [`GatewayConfig`] that is then injected into the
//! handlers. Optional variables fall back to schema defaults; required ones
//! fail fast with a named error.

use std::env;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("configuration validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn parse_var<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::InvalidVar {
            name,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

impl GatewayConfig {
    /// Build and validate a configuration from the process environment.
    ///
    /// Required: `FALLBACK_BASE_URL`, `BLOB_ENDPOINT`, `BLOB_BUCKET`.
    /// Everything else is optional with schema defaults; `SERVICE_ROLE_KEY`
    /// is applied to both failover targets and the render backend unless a
    /// more specific variable overrides it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = GatewayConfig::default();

        if let Some(bind) = optional("GATEWAY_BIND_ADDRESS") {
            config.listener.bind_address = bind;
        }

        let service_role = optional("SERVICE_ROLE_KEY");

        config.failover.primary_base_url = optional("PRIMARY_BASE_URL");
        config.failover.fallback_base_url = required("FALLBACK_BASE_URL")?;
        config.failover.fallback_bearer_token = service_role.clone();
        // Reference behavior: the primary receives the fallback's token.
        // PRIMARY_SEND_AUTHORIZATION=false withholds it instead.
        let authorize_primary = parse_var::<bool>("PRIMARY_SEND_AUTHORIZATION")?.unwrap_or(true);
        config.failover.primary_bearer_token = if authorize_primary {
            optional("PRIMARY_BEARER_TOKEN").or_else(|| service_role.clone())
        } else {
            None
        };

        config.render.base_url =
            optional("RENDER_BASE_URL").unwrap_or_else(|| config.failover.fallback_base_url.clone());
        config.render.bearer_token = service_role;
        if let Some(site_id) = optional("RENDER_SITE_ID") {
            config.render.site_id = site_id;
        }

        config.blob.endpoint = required("BLOB_ENDPOINT")?;
        config.blob.bucket = required("BLOB_BUCKET")?;
        config.blob.access_token = optional("BLOB_ACCESS_TOKEN");
        if let Some(cap) = parse_var::<usize>("BLOB_MAX_OBJECT_BYTES")? {
            config.blob.max_object_bytes = cap;
        }

        if let Some(api_base) = optional("DISPATCH_API_BASE") {
            config.dispatch.api_base = api_base;
        }
        if let Some(repository) = optional("DISPATCH_REPOSITORY") {
            config.dispatch.repository = repository;
        }
        if let Some(event_type) = optional("DISPATCH_EVENT_TYPE") {
            config.dispatch.event_type = event_type;
        }
        config.dispatch.token = optional("DISPATCH_TOKEN");

        if let Some(upstream_ms) = parse_var::<u64>("UPSTREAM_TIMEOUT_MS")? {
            config.timeouts.upstream_ms = upstream_ms;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

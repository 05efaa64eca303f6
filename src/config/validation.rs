//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde/env parsing handles syntactic)
//! - Check base URLs actually parse as absolute URLs
//! - Validate value ranges (timeouts > 0, size caps > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("{field} is required but empty")]
    MissingField { field: &'static str },

    #[error("{field} is not an absolute URL: {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("dispatch repository {0:?} is not of the form owner/repo")]
    InvalidRepository(String),
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError::MissingField { field });
    } else if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "listener.max_body_bytes",
        });
    }

    // The primary is optional, the fallback is not.
    if let Some(primary) = &config.failover.primary_base_url {
        check_url(&mut errors, "failover.primary_base_url", primary);
    }
    check_url(
        &mut errors,
        "failover.fallback_base_url",
        &config.failover.fallback_base_url,
    );

    check_url(&mut errors, "render.base_url", &config.render.base_url);
    check_url(&mut errors, "blob.endpoint", &config.blob.endpoint);
    if config.blob.bucket.is_empty() {
        errors.push(ValidationError::MissingField {
            field: "blob.bucket",
        });
    }
    if config.blob.max_object_bytes == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "blob.max_object_bytes",
        });
    }

    check_url(&mut errors, "dispatch.api_base", &config.dispatch.api_base);
    if config.dispatch.repository.is_empty() {
        // A token with no repository would fire at "/repos//dispatches".
        if config.dispatch.token.is_some() {
            errors.push(ValidationError::MissingField {
                field: "dispatch.repository",
            });
        }
    } else if config.dispatch.repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
        errors.push(ValidationError::InvalidRepository(
            config.dispatch.repository.clone(),
        ));
    }

    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "timeouts.upstream_ms",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "timeouts.request_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.failover.fallback_base_url = "https://fallback.example.com/functions/v1".into();
        config.render.base_url = "https://fallback.example.com".into();
        config.blob.endpoint = "https://store.example.com".into();
        config.blob.bucket = "assets".into();
        config.dispatch.repository = "acme/sitemap".into();
        config
    }

    #[test]
    fn accepts_complete_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = valid_config();
        config.failover.fallback_base_url = "not a url".into();
        config.blob.bucket = String::new();
        config.timeouts.upstream_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn missing_primary_is_not_an_error() {
        let mut config = valid_config();
        config.failover.primary_base_url = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_malformed_repository() {
        let mut config = valid_config();
        config.dispatch.repository = "just-a-name".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidRepository(_))));
    }

    #[test]
    fn token_without_repository_is_rejected() {
        let mut config = valid_config();
        config.dispatch.repository = String::new();
        config.dispatch.token = Some("gh-token".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::MissingField {
                field: "dispatch.repository"
            }
        )));
    }

    #[test]
    fn missing_repository_without_token_is_tolerated() {
        let mut config = valid_config();
        config.dispatch.repository = String::new();
        config.dispatch.token = None;
        assert!(validate_config(&config).is_ok());
    }
}

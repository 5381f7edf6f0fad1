//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are
//! collected so a bad config file can be fixed in one pass.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url `{0}` must be an absolute http(s) URL")]
    UpstreamUrl(String),

    #[error("upstream.base_url `{0}` must not contain a query or fragment")]
    UpstreamUrlSuffix(String),

    #[error("routing.prefix `{0}` must start with '/', not end with '/', and not be the root")]
    Prefix(String),

    #[error("credential.env_var must not be empty")]
    CredentialVar,

    #[error("cors.{field} `{value}` is not a valid header value")]
    CorsHeader { field: &'static str, value: String },

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::UpstreamUrlSuffix(config.upstream.base_url.clone()));
            }
        }
        _ => errors.push(ValidationError::UpstreamUrl(config.upstream.base_url.clone())),
    }

    let prefix = &config.routing.prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains('?') {
        errors.push(ValidationError::Prefix(prefix.clone()));
    }

    if config.credential.env_var.trim().is_empty() {
        errors.push(ValidationError::CredentialVar);
    }

    let cors_fields = [
        ("allow_origin", &config.cors.allow_origin),
        ("allow_methods", &config.cors.allow_methods),
        ("allow_headers", &config.cors.allow_headers),
    ];
    for (field, value) in cors_fields {
        if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::CorsHeader {
                field,
                value: value.clone(),
            });
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! CORS handling.
//!
//! The allow-* headers are attached to every response by
//! `SetResponseHeaderLayer`s in the server; this middleware only answers
//! preflight requests before they reach the forwarding pipeline.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::observability::metrics;

/// Pre-encoded CORS header values.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)?,
            allow_methods: HeaderValue::from_str(&config.allow_methods)?,
            allow_headers: HeaderValue::from_str(&config.allow_headers)?,
        })
    }
}

/// Answer `OPTIONS` with an empty 200 on any path.
pub async fn preflight_middleware(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        metrics::record_request("OPTIONS", 200, metrics::OUTCOME_PREFLIGHT, Instant::now());
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_encode() {
        let headers = CorsHeaders::from_config(&CorsConfig::default()).unwrap();
        assert_eq!(headers.allow_origin, "http://localhost:5173");
        assert_eq!(headers.allow_methods, "GET, POST, PUT, DELETE, OPTIONS");
        assert_eq!(headers.allow_headers, "Content-Type, Authorization");
    }
}

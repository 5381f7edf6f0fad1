//! Request forwarding pipeline.
//!
//! # Stages
//! ```text
//! route (prefix) → credential → path → build outbound → call upstream → relay
//! ```
//!
//! Each stage is a plain function returning `Result<_, ProxyError>`; the
//! `Forwarder` runs them in order and stops at the first error. CORS
//! preflight is answered before the pipeline runs (see `http::middleware`).

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde_json::Value;
use url::Url;

use crate::config::ProxyConfig;
use crate::forwarding::error::ProxyError;
use crate::routing::{PathPrefixMatcher, PrefixMatch};
use crate::security::{forward_headers, Credential};

/// Everything needed to issue one upstream call.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Forwards requests under the fixed prefix to the upstream API.
///
/// Stateless apart from the pooled HTTP client; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: String,
    matcher: PathPrefixMatcher,
    credential: Credential,
    credential_var: String,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(config: &ProxyConfig, credential: Credential) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_secs));
        if let Some(secs) = config.upstream.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.upstream.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.upstream.base_url.trim_end_matches('/').to_string(),
            matcher: PathPrefixMatcher::new(config.routing.prefix.clone()),
            credential,
            credential_var: config.credential.env_var.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        })
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    /// Run the pipeline for one inbound request.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let upstream_path = match self.matcher.strip(&parts.uri) {
            PrefixMatch::Outside => return Err(ProxyError::NotFound),
            m => m,
        };
        let authorization = require_credential(&self.credential, &self.credential_var)?;
        let url = upstream_url(&self.base_url, &upstream_path)?;

        let body = if parts.method == Method::GET {
            None
        } else {
            let bytes = axum::body::to_bytes(body, self.max_body_bytes)
                .await
                .map_err(|e| body_read_error(e, self.max_body_bytes))?;
            encode_body(&bytes)?
        };

        let outbound = build_outbound(parts.method, url, &parts.headers, authorization, body);
        self.send(outbound).await
    }

    async fn send(&self, outbound: OutboundRequest) -> Result<Response, ProxyError> {
        tracing::debug!(method = %outbound.method, url = %outbound.url, "Calling upstream");

        let mut builder = self
            .client
            .request(outbound.method, outbound.url)
            .headers(outbound.headers);
        if let Some(body) = outbound.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        check_declared_content(status, response.headers())?;

        let bytes = response.bytes().await?;
        let value = decode_upstream(&bytes)?;
        Ok((status, Json(value)).into_response())
    }
}

/// Credential stage: the bearer header, or a configuration error.
pub fn require_credential(credential: &Credential, var: &str) -> Result<HeaderValue, ProxyError> {
    if credential.token().is_none() {
        return Err(ProxyError::MissingCredential(var.to_string()));
    }
    credential.authorization().ok_or(ProxyError::InvalidCredential)
}

/// Path stage: map the stripped path onto the upstream base URL.
///
/// The remainder is appended rather than resolved, so it can never change
/// the upstream host.
pub fn upstream_url(base_url: &str, matched: &PrefixMatch<'_>) -> Result<Url, ProxyError> {
    let (path, query) = match matched {
        PrefixMatch::Forward { path, query } => (*path, *query),
        PrefixMatch::Root => return Err(ProxyError::RootPath),
        PrefixMatch::Outside => return Err(ProxyError::NotFound),
    };

    let target = match query {
        Some(q) => format!("{}/{}?{}", base_url, path, q),
        None => format!("{}/{}", base_url, path),
    };
    Ok(Url::parse(&target)?)
}

/// Classify a failed body read: only the length limit is the caller's fault.
pub fn body_read_error(err: axum::Error, limit: usize) -> ProxyError {
    let inner = err.into_inner();
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(inner.as_ref());
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return ProxyError::BodyTooLarge(limit);
        }
        source = e.source();
    }
    ProxyError::ReadBody(inner)
}

/// Body stage: decode the inbound JSON and re-encode it.
///
/// An empty body is forwarded as no body.
pub fn encode_body(bytes: &Bytes) -> Result<Option<Vec<u8>>, ProxyError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(ProxyError::InvalidBody)?;
    serde_json::to_vec(&value).map(Some).map_err(ProxyError::Encode)
}

pub fn build_outbound(
    method: Method,
    url: Url,
    inbound: &HeaderMap,
    authorization: HeaderValue,
    body: Option<Vec<u8>>,
) -> OutboundRequest {
    let mut headers = forward_headers(inbound, authorization);
    if body.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    OutboundRequest {
        method,
        url,
        headers,
        body,
    }
}

/// Relay stage, part one: a non-200 response must declare content.
///
/// An unparseable `content-length` counts as declared content.
pub fn check_declared_content(status: StatusCode, headers: &HeaderMap) -> Result<(), ProxyError> {
    if status == StatusCode::OK {
        return Ok(());
    }
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().parse::<u64>().map_or(true, |n| n != 0))
        .unwrap_or(false);
    if declared {
        Ok(())
    } else {
        Err(ProxyError::UpstreamEmpty(status))
    }
}

/// Relay stage, part two: the upstream body must be JSON.
pub fn decode_upstream(bytes: &[u8]) -> Result<Value, ProxyError> {
    serde_json::from_slice(bytes).map_err(ProxyError::UpstreamJson)
}

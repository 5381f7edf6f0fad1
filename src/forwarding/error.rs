//! Error taxonomy for the forwarding pipeline.
//!
//! Every variant renders as a `{"error": <string>}` JSON envelope. Internal
//! failures carry their cause for the log but expose only a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const ROOT_PATH_MESSAGE: &str = "This is just the root path of the proxy! It doesn't do anything on its own. You need to append the path of the 1inch API you want to talk to";
pub const NO_CONTENT_MESSAGE: &str = "No content returned";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const INVALID_BODY_MESSAGE: &str = "Request body is not valid JSON";
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Coarse error category, used for logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Usage,
    UpstreamEmpty,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration_error",
            ErrorKind::Usage => "usage_error",
            ErrorKind::UpstreamEmpty => "upstream_empty",
            ErrorKind::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Credential variable unset or empty. Holds the variable name.
    #[error("{0} is missing from env")]
    MissingCredential(String),

    /// Credential cannot be encoded as a header value.
    #[error("credential is not a valid header value")]
    InvalidCredential,

    #[error("request path is outside the proxy prefix")]
    NotFound,

    #[error("bare proxy root requested without an upstream path")]
    RootPath,

    #[error("invalid JSON request body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// Body stream failed for a reason other than the size limit.
    #[error("failed to read request body: {0}")]
    ReadBody(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-200 upstream response without declared content.
    #[error("upstream returned {0} without content")]
    UpstreamEmpty(StatusCode),

    #[error("invalid upstream URL: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned malformed JSON: {0}")]
    UpstreamJson(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MissingCredential(_) | ProxyError::InvalidCredential => {
                ErrorKind::Configuration
            }
            ProxyError::NotFound
            | ProxyError::RootPath
            | ProxyError::InvalidBody(_)
            | ProxyError::BodyTooLarge(_) => ErrorKind::Usage,
            ProxyError::UpstreamEmpty(_) => ErrorKind::UpstreamEmpty,
            ProxyError::UpstreamUrl(_)
            | ProxyError::Upstream(_)
            | ProxyError::UpstreamJson(_)
            | ProxyError::ReadBody(_)
            | ProxyError::Encode(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::RootPath | ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UpstreamEmpty(status) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the client-facing envelope.
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::MissingCredential(_) => self.to_string(),
            ProxyError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ProxyError::RootPath => ROOT_PATH_MESSAGE.to_string(),
            ProxyError::InvalidBody(_) => INVALID_BODY_MESSAGE.to_string(),
            ProxyError::BodyTooLarge(_) => BODY_TOO_LARGE_MESSAGE.to_string(),
            ProxyError::UpstreamEmpty(_) => NO_CONTENT_MESSAGE.to_string(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

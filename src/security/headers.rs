//! Header filtering for forwarded requests.
//!
//! # Responsibilities
//! - Copy client headers onto the upstream request
//! - Drop `Host` so the client derives it from the upstream URL
//! - Drop framing and hop-by-hop headers the client recomputes
//! - Drop `Accept-Encoding` so the upstream answers uncompressed and its
//!   `Content-Length` reaches the relay stage untouched
//! - Overwrite `Authorization` with the server-held credential

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Headers never copied from the inbound request.
fn is_stripped(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "host"
            | "content-length"
            | "transfer-encoding"
            | "connection"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "upgrade"
            | "accept-encoding"
    )
}

/// Build the upstream header map from the inbound one.
pub fn forward_headers(inbound: &HeaderMap, authorization: HeaderValue) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 1);

    for (name, value) in inbound {
        if is_stripped(name) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    outbound.insert(header::AUTHORIZATION, authorization);
    outbound
}

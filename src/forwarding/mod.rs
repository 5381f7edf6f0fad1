//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (after CORS preflight)
//!     → pipeline.rs (prefix → credential → path → outbound → upstream → relay)
//!     → Ok(upstream status + JSON) | Err(ProxyError)
//!     → error.rs (ProxyError → {"error": ...} envelope)
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream call per inbound request: no retries, no cache
//! - The inbound body is decoded and re-encoded, never streamed raw
//! - Internal failures are logged; clients only see a generic message

pub mod error;
pub mod pipeline;

pub use error::{ErrorKind, ProxyError};
pub use pipeline::{Forwarder, OutboundRequest};

//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     process environment → credential.rs (Credential, redacted Debug)
//!
//! Outgoing request:
//!     inbound headers
//!     → headers.rs (drop Host and framing headers)
//!     → inject Authorization: Bearer <token>
//!     → upstream client
//! ```
//!
//! # Design Decisions
//! - The browser never sees the credential
//! - Client-supplied Authorization is always replaced

pub mod credential;
pub mod headers;

pub use credential::Credential;
pub use headers::forward_headers;

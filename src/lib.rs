//! Aggregator forwarding proxy library.
//!
//! Forwards browser requests under a fixed prefix to the swap-aggregation
//! API, injecting a server-held bearer token.

pub mod config;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use forwarding::{Forwarder, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::Credential;

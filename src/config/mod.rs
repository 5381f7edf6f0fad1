//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the request handler
//!
//! process environment
//!     → loader::resolve_credential (once, at startup)
//!     → Credential injected into handler state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow an empty or missing config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_credential, ConfigError};
pub use schema::{
    CorsConfig, CredentialConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    RoutingConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};

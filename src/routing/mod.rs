//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → matcher.rs (strip the fixed prefix)
//!     → Outside | Root | Forward { path, query }
//! ```
//!
//! # Design Decisions
//! - One fixed prefix, compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)

pub mod matcher;

pub use matcher::{PathPrefixMatcher, PrefixMatch};

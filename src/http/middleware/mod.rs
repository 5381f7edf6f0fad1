//! Request middleware.

pub mod cors;

pub use cors::{preflight_middleware, CorsHeaders};

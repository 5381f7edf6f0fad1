//! Upstream bearer credential.

use std::fmt;

use axum::http::HeaderValue;

/// Server-held bearer token for the upstream API.
///
/// Resolved once and injected into the handler; an empty value counts as
/// absent. `Debug` never prints the token.
#[derive(Clone, Default)]
pub struct Credential {
    token: Option<String>,
}

impl Credential {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Shorthand for a present credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `Authorization` header value, or `None` when absent or not
    /// representable as a header.
    pub fn authorization(&self) -> Option<HeaderValue> {
        let token = self.token.as_deref()?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.token.is_some() { "<redacted>" } else { "<missing>" };
        f.debug_struct("Credential").field("token", &state).finish()
    }
}

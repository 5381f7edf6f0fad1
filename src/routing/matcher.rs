//! Prefix matching for the proxy entry point.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - The prefix must end at a segment boundary (`/api` does not match `/apix`)
//! - The remainder is forwarded verbatim, percent-encoding included

use axum::http::Uri;

/// Result of matching a URI against the proxy prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixMatch<'a> {
    /// Path is outside the prefix.
    Outside,
    /// Path is the prefix itself, or the prefix followed only by `/`.
    Root,
    /// Upstream path (no leading slash) and optional query.
    Forward { path: &'a str, query: Option<&'a str> },
}

/// Matches and strips the fixed path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing slash is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn strip<'a>(&self, uri: &'a Uri) -> PrefixMatch<'a> {
        let Some(rest) = uri.path().strip_prefix(self.prefix.as_str()) else {
            return PrefixMatch::Outside;
        };

        let rest = match rest {
            "" => return PrefixMatch::Root,
            r if r.starts_with('/') => &r[1..],
            _ => return PrefixMatch::Outside,
        };

        if rest.is_empty() || rest == "/" {
            return PrefixMatch::Root;
        }

        PrefixMatch::Forward {
            path: rest,
            query: uri.query(),
        }
    }
}

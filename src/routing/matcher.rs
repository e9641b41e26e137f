//! Route matching logic.
//!
//! # Responsibilities
//! - Parse path patterns (exact or trailing `/**` wildcard)
//! - Capture the path remainder below a wildcard prefix
//! - Parse and resolve upstream target templates
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Wildcards are only allowed as the final `/**` segment
//! - Wildcard prefixes match on segment boundaries: `/api/**` covers `/api`
//!   and `/api/...` but not `/apix`
//! - No regex to guarantee O(n) matching

use axum::http::Uri;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Trailing marker meaning "everything below this point".
pub const WILDCARD: &str = "/**";

/// Errors raised while compiling or resolving a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("pattern '{0}' must start with '/'")]
    RelativePattern(String),

    #[error("'{0}' may only use a wildcard as its final '/**' segment")]
    MisplacedWildcard(String),

    #[error("target '{target}' is not a valid URL: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("target '{0}' must use the http scheme")]
    UnsupportedScheme(String),

    #[error("target '{target}' has a wildcard but pattern '{pattern}' captures nothing")]
    UncapturedWildcard { pattern: String, target: String },

    #[error("resolved upstream '{0}' is not a valid URI")]
    InvalidUri(String),
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches the path verbatim.
    Exact(String),
    /// Matches the fixed prefix and everything below it.
    Prefix(String),
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::RelativePattern(pattern.to_string()));
        }

        match pattern.strip_suffix(WILDCARD) {
            Some(prefix) if !prefix.contains('*') => Ok(RoutePattern::Prefix(prefix.to_string())),
            None if !pattern.contains('*') => Ok(RoutePattern::Exact(pattern.to_string())),
            _ => Err(RouteError::MisplacedWildcard(pattern.to_string())),
        }
    }

    /// Returns the captured remainder if `path` matches.
    ///
    /// Exact patterns capture the empty string.
    pub fn capture<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            RoutePattern::Exact(expected) => (path == expected).then_some(""),
            RoutePattern::Prefix(prefix) => {
                let rest = path.strip_prefix(prefix.as_str())?;
                (rest.is_empty() || rest.starts_with('/')).then_some(rest)
            }
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.capture(path).is_some()
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, RoutePattern::Prefix(_))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Exact(path) => f.write_str(path),
            RoutePattern::Prefix(prefix) => write!(f, "{}{}", prefix, WILDCARD),
        }
    }
}

/// A compiled upstream target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTemplate {
    base: String,
    wildcard: bool,
}

impl TargetTemplate {
    pub fn parse(target: &str) -> Result<Self, RouteError> {
        let (base, wildcard) = match target.strip_suffix(WILDCARD) {
            Some(base) => (base.trim_end_matches('/'), true),
            None => (target, false),
        };

        if base.contains('*') {
            return Err(RouteError::MisplacedWildcard(target.to_string()));
        }

        let url = Url::parse(base).map_err(|e| RouteError::InvalidTarget {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" {
            return Err(RouteError::UnsupportedScheme(target.to_string()));
        }
        if url.host().is_none() {
            return Err(RouteError::InvalidTarget {
                target: target.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            base: base.to_string(),
            wildcard,
        })
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Build the upstream URI from the captured remainder and the incoming query.
    pub fn resolve(&self, captured: &str, query: Option<&str>) -> Result<Uri, RouteError> {
        let mut target = self.base.clone();
        if self.wildcard {
            target.push_str(captured);
        }

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push(if target.contains('?') { '&' } else { '?' });
            target.push_str(query);
        }

        Uri::try_from(target.as_str()).map_err(|_| RouteError::InvalidUri(target))
    }
}

impl fmt::Display for TargetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "{}{}", self.base, WILDCARD)
        } else {
            f.write_str(&self.base)
        }
    }
}

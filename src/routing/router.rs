//! Route lookup.
//!
//! # Responsibilities
//! - Store the ordered rule table
//! - Classify a stripped path to a backend identity
//! - Return the matched rule or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order (the table is tiny)
//! - Explicit NoRouteMatch rather than silent default

use crate::backend::BackendId;
use crate::error::ProxyError;
use crate::routing::matcher::PathPattern;

/// A (pattern, backend) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub backend: BackendId,
}

impl RouteRule {
    pub fn new(pattern: PathPattern, backend: BackendId) -> Self {
        Self { pattern, backend }
    }
}

/// Ordered rule table; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The tracking endpoints go to the API, everything else under `/v1/`
    /// and the analytics.js bundle go to the CDN.
    pub fn standard() -> Self {
        Self::new(vec![
            RouteRule::new(PathPattern::exact("/v1/import"), BackendId::Api),
            RouteRule::new(PathPattern::exact("/v1/pixel"), BackendId::Api),
            RouteRule::new(PathPattern::wildcard("/analytics.js/*"), BackendId::Cdn),
            RouteRule::new(PathPattern::wildcard("/v1/*"), BackendId::Cdn),
        ])
    }

    /// Find the first rule matching `path`.
    pub fn match_path(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|rule| rule.pattern.matches(path))
    }

    /// Resolve `path` to a backend identity.
    pub fn classify(&self, path: &str) -> Result<BackendId, ProxyError> {
        self.match_path(path)
            .map(|rule| rule.backend)
            .ok_or_else(|| ProxyError::NoRouteMatch {
                path: path.to_string(),
            })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

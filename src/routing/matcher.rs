//! Path pattern matching.
//!
//! # Responsibilities
//! - Match exact paths
//! - Match path prefixes (case-sensitive)
//! - Match segment wildcards such as `/analytics.js/*`
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - The empty path never matches an exact or prefix pattern
//! - Wildcards are pre-split into segments at construction

use std::fmt;

/// One segment of a wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Any,
}

/// A path-matching expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Path equals the literal.
    Exact(String),
    /// Path starts with the literal.
    Prefix(String),
    /// `/`-separated segments where `*` matches one segment, or the
    /// remainder of the path when it is the last segment.
    Wildcard(WildcardPattern),
}

impl PathPattern {
    pub fn exact(path: impl Into<String>) -> Self {
        PathPattern::Exact(path.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        PathPattern::Prefix(prefix.into())
    }

    pub fn wildcard(pattern: &str) -> Self {
        PathPattern::Wildcard(WildcardPattern::new(pattern))
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        if path.is_empty() {
            return matches!(self, PathPattern::Wildcard(w) if w.matches(path));
        }
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathPattern::Wildcard(w) => w.matches(path),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(p) => write!(f, "exact:{}", p),
            PathPattern::Prefix(p) => write!(f, "prefix:{}", p),
            PathPattern::Wildcard(w) => write!(f, "wildcard:{}", w.source),
        }
    }
}

/// A pre-split segment wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    source: String,
    segments: Vec<Segment>,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|s| match s {
                "*" => Segment::Any,
                lit => Segment::Literal(lit.to_string()),
            })
            .collect();
        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/');
        let last = self.segments.len().saturating_sub(1);

        for (i, segment) in self.segments.iter().enumerate() {
            let part = parts.next();
            match segment {
                // Trailing `*` swallows the rest, but needs its separator.
                Segment::Any if i == last => return part.is_some(),
                Segment::Any => {
                    if part.map_or(true, str::is_empty) {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if part != Some(lit.as_str()) {
                        return false;
                    }
                }
            }
        }

        parts.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matcher() {
        let matcher = PathPattern::exact("/v1/import");
        assert!(matcher.matches("/v1/import"));
        assert!(!matcher.matches("/v1/import/"));
        assert!(!matcher.matches("/v1/imports"));
        assert!(!matcher.matches("/V1/IMPORT")); // Case sensitive
    }

    #[test]
    fn test_prefix_matcher() {
        let matcher = PathPattern::prefix("/v1");
        assert!(matcher.matches("/v1"));
        assert!(matcher.matches("/v1/projects"));
        assert!(matcher.matches("/v10"));
        assert!(!matcher.matches("/analytics.js"));
    }

    #[test]
    fn test_trailing_wildcard() {
        let matcher = PathPattern::wildcard("/analytics.js/*");
        assert!(matcher.matches("/analytics.js/v1"));
        assert!(matcher.matches("/analytics.js/v1/abc/analytics.min.js"));
        assert!(matcher.matches("/analytics.js/"));
        assert!(!matcher.matches("/analytics.js"));
        assert!(!matcher.matches("/analytics.jsx/v1"));
    }

    #[test]
    fn test_interior_wildcard() {
        let matcher = PathPattern::wildcard("/v1/projects/*/settings");
        assert!(matcher.matches("/v1/projects/abc/settings"));
        assert!(!matcher.matches("/v1/projects//settings"));
        assert!(!matcher.matches("/v1/projects/abc/settings/extra"));
        assert!(!matcher.matches("/v1/projects/abc"));
    }

    #[test]
    fn test_empty_path() {
        assert!(!PathPattern::exact("").matches(""));
        assert!(!PathPattern::prefix("").matches(""));
        assert!(!PathPattern::wildcard("/v1/*").matches(""));
        assert!(PathPattern::wildcard("*").matches(""));
    }
}

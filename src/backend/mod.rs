//! Backend targets.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig (cdn_url, api_url)
//!     → target.rs (parse, validate, precompute scheme/authority/base path)
//!     → Backends (immutable pair, shared via Arc)
//!     → dispatcher looks up the target for a classified BackendId
//! ```
//!
//! # Design Decisions
//! - Exactly two identities; a closed enum instead of string group names
//! - Targets resolved once at startup and never mutated
//! - One target per identity, no load balancing

pub mod target;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, UpstreamConfig};

pub use target::BackendTarget;

/// Identity of the downstream service a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// Content delivery (analytics.js, project settings).
    Cdn,
    /// Tracking API (import, pixel).
    Api,
}

impl BackendId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackendId::Cdn => "cdn",
            BackendId::Api => "api",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved CDN and API targets.
#[derive(Debug, Clone)]
pub struct Backends {
    cdn: BackendTarget,
    api: BackendTarget,
}

impl Backends {
    pub fn new(cdn: BackendTarget, api: BackendTarget) -> Self {
        Self { cdn, api }
    }

    /// Parse both upstream URLs, failing on the first malformed one.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let cdn = BackendTarget::parse(BackendId::Cdn, &config.cdn_url)?;
        let api = BackendTarget::parse(BackendId::Api, &config.api_url)?;
        Ok(Self::new(cdn, api))
    }

    pub fn get(&self, id: BackendId) -> &BackendTarget {
        match id {
            BackendId::Cdn => &self.cdn,
            BackendId::Api => &self.api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = UpstreamConfig {
            cdn_url: "http://cdn.local:8001".into(),
            api_url: "http://api.local:8002/base".into(),
            mount_prefix: String::new(),
        };
        let backends = Backends::from_config(&config).unwrap();
        assert_eq!(backends.get(BackendId::Cdn).id(), BackendId::Cdn);
        assert_eq!(backends.get(BackendId::Api).authority().as_str(), "api.local:8002");
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = UpstreamConfig {
            cdn_url: "http://cdn.local".into(),
            api_url: "not a url".into(),
            mount_prefix: String::new(),
        };
        let err = Backends::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "api_url", .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(BackendId::Cdn.to_string(), "cdn");
        assert_eq!(BackendId::Api.to_string(), "api");
    }
}

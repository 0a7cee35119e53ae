//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Both upstream URLs must be absolute `http`/`https` URLs with a host
//! - Mount prefix must be empty or a rooted path without trailing slash
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::backend::{BackendId, BackendTarget};
use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the whole config, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if let Err(e) = BackendTarget::parse(BackendId::Cdn, &config.upstreams.cdn_url) {
        errors.push(ValidationError::new("upstreams.cdn_url", e.to_string()));
    }
    if let Err(e) = BackendTarget::parse(BackendId::Api, &config.upstreams.api_url) {
        errors.push(ValidationError::new("upstreams.api_url", e.to_string()));
    }

    let prefix = &config.upstreams.mount_prefix;
    if !prefix.is_empty() {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::new(
                "upstreams.mount_prefix",
                "must start with '/'",
            ));
        }
        if prefix.ends_with('/') {
            errors.push(ValidationError::new(
                "upstreams.mount_prefix",
                "must not end with '/'",
            ));
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be > 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {:?}", observability.metrics_address),
        ));
    }
    if !matches!(observability.log_format.as_str(), "text" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected \"text\" or \"json\", got {:?}", observability.log_format),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

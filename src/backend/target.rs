//! A single backend target.
//!
//! # Responsibilities
//! - Validate the configured base URL
//! - Pre-compute scheme, authority and base path for URI rewriting
//! - Join the base path with the stripped request path

use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

use crate::backend::BackendId;
use crate::config::ConfigError;
use crate::error::ProxyError;

/// An immutable (base URL, identity) pair.
#[derive(Debug, Clone)]
pub struct BackendTarget {
    id: BackendId,
    /// Original base URL, kept for logging.
    base_url: Url,
    scheme: Scheme,
    authority: Authority,
    base_path: String,
    base_query: Option<String>,
}

impl BackendTarget {
    /// Parse an absolute `http` or `https` base URL.
    pub fn parse(id: BackendId, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            name: config_key(id),
            url: raw.to_string(),
            reason,
        };

        let base_url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        let scheme = match base_url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(invalid(format!("unsupported scheme {:?}", other))),
        };
        let host = base_url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority = match base_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            id,
            scheme,
            authority,
            base_path: base_url.path().to_string(),
            base_query: base_url.query().filter(|q| !q.is_empty()).map(str::to_string),
            base_url,
        })
    }

    pub fn id(&self) -> BackendId {
        self.id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Build the absolute upstream URI for a stripped request path.
    pub fn forward_uri(&self, path: &str, query: Option<&str>) -> Result<Uri, ProxyError> {
        let mut path_and_query = join_path(&self.base_path, path);
        match (self.base_query.as_deref(), query.filter(|q| !q.is_empty())) {
            (Some(base), Some(q)) => {
                path_and_query.push('?');
                path_and_query.push_str(base);
                path_and_query.push('&');
                path_and_query.push_str(q);
            }
            (Some(q), None) | (None, Some(q)) => {
                path_and_query.push('?');
                path_and_query.push_str(q);
            }
            (None, None) => {}
        }

        let path_and_query = PathAndQuery::from_str(&path_and_query)
            .map_err(|e| ProxyError::RequestBuild(e.to_string()))?;

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ProxyError::RequestBuild(e.to_string()))
    }
}

fn config_key(id: BackendId) -> &'static str {
    match id {
        BackendId::Cdn => "cdn_url",
        BackendId::Api => "api_url",
    }
}

/// Join two path fragments with exactly one slash between them.
fn join_path(base: &str, path: &str) -> String {
    if path.is_empty() {
        return if base.is_empty() { "/".to_string() } else { base.to_string() };
    }
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

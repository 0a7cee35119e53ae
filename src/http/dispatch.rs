//! Proxy dispatcher.
//!
//! # Responsibilities
//! - Strip the mount prefix from the request path
//! - Classify the stripped path against the route table
//! - Rewrite the request URI onto the resolved backend
//! - Forward through the shared hyper-util client and relay the response
//!
//! # Design Decisions
//! - Prefix and classification are pure CPU work; only the transport awaits
//! - Paths outside the mount prefix are forwarded unchanged, not rejected
//! - No retries, no fallback target: transport errors become 502
//! - A backend slower than the request timeout becomes 504
//! - One pooled client serves both `http` and `https` backends

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::HOST;
use axum::http::{HeaderValue, Request, Uri, Version};
use axum::response::Response;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::backend::{BackendId, Backends};
use crate::config::{ConfigError, ProxyConfig, TimeoutConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::http::headers::{set_forwarded, strip_hop_by_hop, strip_request_hop_by_hop};
use crate::routing::RouteTable;

/// Remove the mount prefix from `path` once, on a segment boundary.
///
/// `/prefix/v1/projects` → `/v1/projects`, `/prefix` → `""`. Paths that do
/// not start with the prefix (including `/prefixed/...`) come back as is.
pub fn strip_mount_prefix<'a>(prefix: &str, path: &'a str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Outcome of routing a request URI.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub backend: BackendId,
    /// Path after mount prefix stripping.
    pub forward_path: String,
    /// Absolute URI on the backend.
    pub upstream_uri: Uri,
}

/// Routes requests to the CDN or API backend.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    backends: Arc<Backends>,
    mount_prefix: String,
    request_timeout: Duration,
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl Dispatcher {
    /// Build a dispatcher with the standard route table and default timeouts.
    ///
    /// Fails if either base URL is not an absolute `http` or `https` URL.
    pub fn new(cdn_url: &str, api_url: &str, mount_prefix: &str) -> Result<Self, ConfigError> {
        let upstreams = UpstreamConfig {
            cdn_url: cdn_url.to_string(),
            api_url: api_url.to_string(),
            mount_prefix: mount_prefix.to_string(),
        };
        let backends = Backends::from_config(&upstreams)?;
        Ok(Self::with_routes(
            RouteTable::standard(),
            backends,
            mount_prefix,
            &TimeoutConfig::default(),
        ))
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let backends = Backends::from_config(&config.upstreams)?;
        Ok(Self::with_routes(
            RouteTable::standard(),
            backends,
            &config.upstreams.mount_prefix,
            &config.timeouts,
        ))
    }

    pub fn with_routes(
        routes: RouteTable,
        backends: Backends,
        mount_prefix: &str,
        timeouts: &TimeoutConfig,
    ) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        // TLS is layered on top, so the inner connector must accept https URIs.
        connector.enforce_http(false);
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .build(connector);

        Self {
            routes: Arc::new(routes),
            backends: Arc::new(backends),
            mount_prefix: mount_prefix.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeouts.request_secs),
            client,
        }
    }

    pub fn mount_prefix(&self) -> &str {
        &self.mount_prefix
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Strip, classify and rewrite. Never touches the network.
    pub fn resolve(&self, uri: &Uri) -> Result<Resolved, ProxyError> {
        let forward_path = strip_mount_prefix(&self.mount_prefix, uri.path());
        let backend = self.routes.classify(forward_path)?;
        let upstream_uri = self
            .backends
            .get(backend)
            .forward_uri(forward_path, uri.query())?;

        Ok(Resolved {
            backend,
            forward_path: forward_path.to_string(),
            upstream_uri,
        })
    }

    /// Send the request to the resolved backend and relay its response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        resolved: &Resolved,
        client_ip: Option<IpAddr>,
    ) -> Result<Response, ProxyError> {
        let target = self.backends.get(resolved.backend);
        let (mut parts, body) = request.into_parts();

        strip_request_hop_by_hop(&mut parts.headers);
        set_forwarded(&mut parts.headers, client_ip);
        let host = HeaderValue::from_str(target.authority().as_str())
            .map_err(|e| ProxyError::RequestBuild(e.to_string()))?;
        parts.headers.insert(HOST, host);
        parts.uri = resolved.upstream_uri.clone();
        // The pooled client speaks HTTP/1.1 to backends.
        parts.version = Version::HTTP_11;

        let pending = self.client.request(Request::from_parts(parts, body));
        let upstream: hyper::Response<Incoming> = tokio::time::timeout(self.request_timeout, pending)
            .await
            .map_err(|_| ProxyError::BackendTimeout {
                backend: resolved.backend,
                timeout: self.request_timeout,
            })?
            .map_err(|e| ProxyError::BackendUnreachable {
                backend: resolved.backend,
                reason: e.to_string(),
            })?;

        let (mut parts, body) = upstream.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    /// Resolve then forward.
    pub async fn handle(
        &self,
        request: Request<Body>,
        client_ip: Option<IpAddr>,
    ) -> Result<Response, ProxyError> {
        let resolved = self.resolve(request.uri())?;
        self.forward(request, &resolved, client_ip).await
    }
}

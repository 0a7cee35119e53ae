//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the liveness route and the proxy fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests through the route table to CDN or API
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, ProxyConfig};
use crate::http::dispatch::Dispatcher;
use crate::http::health::{health_handler, HEALTH_PATH};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails fast on an unparsable backend URL.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let dispatcher = Dispatcher::from_config(&config)?;
        let router = app(dispatcher, Duration::from_secs(config.timeouts.request_secs));
        Ok(Self { router, config })
    }

    /// The fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            cdn = %self.config.upstreams.cdn_url,
            api = %self.config.upstreams.api_url,
            mount_prefix = %self.config.upstreams.mount_prefix,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// A request still running when `request_timeout` expires is answered with
/// 504, the same status the dispatcher uses for a slow backend.
pub fn app(dispatcher: Dispatcher, request_timeout: Duration) -> Router {
    Router::new()
        .route(HEALTH_PATH, any(health_handler))
        .fallback(proxy_handler)
        .with_state(AppState { dispatcher })
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    request_timeout,
                )),
        )
}

/// Main proxy handler.
/// Strips the mount prefix, classifies the path and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let resolved = match state.dispatcher.resolve(request.uri()) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, error = %e, "No route matched");
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), "none", start_time);
            return response;
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        forward_path = %resolved.forward_path,
        backend = %resolved.backend,
        "Proxying request"
    );

    match state.dispatcher.forward(request, &resolved, client_ip).await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                tracing::info!(
                    request_id = %request_id,
                    backend = %resolved.backend,
                    status = %status,
                    "Backend returned non-success status"
                );
            }
            metrics::record_request(&method, status.as_u16(), resolved.backend.as_str(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                backend = %resolved.backend,
                forward_path = %resolved.forward_path,
                error = %e,
                "Upstream error"
            );
            let response = e.into_response();
            metrics::record_request(
                &method,
                response.status().as_u16(),
                resolved.backend.as_str(),
                start_time,
            );
            response
        }
    }
}

//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use segment_proxy::config::ProxyConfig;
use segment_proxy::http::HttpServer;
use segment_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// What a mock backend saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub method: String,
    pub host: Option<String>,
    pub forwarded_for: Option<String>,
}

/// A mock backend that records every request it receives.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start a backend answering every request with `status` and `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let recorder = seen.clone();
    let app = Router::new().fallback(move |req: Request<Body>| {
        let recorder = recorder.clone();
        async move {
            let header = |name: &str| {
                req.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            recorder.lock().unwrap().push(SeenRequest {
                path: req.uri().path().to_string(),
                query: req.uri().query().map(str::to_string),
                method: req.method().to_string(),
                host: header("host"),
                forwarded_for: header("x-forwarded-for"),
            });
            (StatusCode::from_u16(status).unwrap(), body)
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, seen }
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the proxy in front of the given backend URLs.
pub async fn start_proxy(cdn_url: &str, api_url: &str, mount_prefix: &str) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.upstreams.cdn_url = cdn_url.to_string();
    config.upstreams.api_url = api_url.to_string();
    config.upstreams.mount_prefix = mount_prefix.to_string();
    config.observability.metrics_enabled = false;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

//! segment-proxy
//!
//! ```text
//! Client request
//!     → strip mount prefix
//!     → classify path
//!         /v1/import, /v1/pixel    → tracking API
//!         /analytics.js/*, /v1/*   → CDN
//!         anything else            → 404
//!     → stream backend response back
//!
//! /_health → 200 "ready" (never routed)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use segment_proxy::config::loader::read_config;
use segment_proxy::config::{validate_config, ConfigError, ProxyConfig};
use segment_proxy::http::HttpServer;
use segment_proxy::lifecycle::Shutdown;
use segment_proxy::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "segment-proxy")]
#[command(about = "Path-based reverse proxy for the Segment CDN and tracking API", long_about = None)]
struct Cli {
    /// TOML config file; flags below override its values.
    #[arg(short, long, env = "SEGMENT_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address.
    #[arg(long, env = "BIND_ADDRESS")]
    bind: Option<String>,

    /// CDN base URL.
    #[arg(long, env = "CDN_URL")]
    cdn_url: Option<String>,

    /// Tracking API base URL.
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    /// Path prefix stripped before routing.
    #[arg(long, env = "URL_PREFIX")]
    mount_prefix: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(cdn_url) = self.cdn_url {
            config.upstreams.cdn_url = cdn_url;
        }
        if let Some(api_url) = self.api_url {
            config.upstreams.api_url = api_url;
        }
        if let Some(prefix) = self.mount_prefix {
            config.upstreams.mount_prefix = prefix;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "segment-proxy starting");

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

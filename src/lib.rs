//! Path-based reverse proxy for Segment's CDN and tracking API.
//!
//! Requests are stripped of a mount prefix, classified by path and
//! forwarded to one of two backends. `/v1/import` and `/v1/pixel` go to the
//! tracking API; `/analytics.js/*` and the rest of `/v1/*` go to the CDN.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use backend::BackendId;
pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{PathPattern, RouteRule, RouteTable};

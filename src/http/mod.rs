//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, /_health)
//!     → request.rs (request ID)
//!     → dispatch.rs (strip mount prefix, classify, rewrite URI)
//!     → headers.rs (hop-by-hop, X-Forwarded-*)
//!     → backend transport (hyper-util client)
//!     → response relayed to client
//! ```

pub mod dispatch;
pub mod headers;
pub mod health;
pub mod request;
pub mod server;

pub use dispatch::{strip_mount_prefix, Dispatcher, Resolved};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{app, HttpServer};

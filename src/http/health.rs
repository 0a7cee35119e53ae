//! Liveness endpoint.
//!
//! Mounted beside the proxy fallback so it never reaches the route table.

use axum::http::StatusCode;
use axum::response::IntoResponse;

pub const HEALTH_PATH: &str = "/_health";

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ready")
}

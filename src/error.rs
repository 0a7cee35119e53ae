//! Proxy error types.
//!
//! Request-path errors map onto HTTP statuses through [`IntoResponse`]; the
//! body never carries backend addresses or transport details.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::backend::BackendId;

/// Errors produced while handling a proxied request.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("No route matches path {path:?}")]
    NoRouteMatch { path: String },

    #[error("Backend {backend} unreachable: {reason}")]
    BackendUnreachable { backend: BackendId, reason: String },

    #[error("Backend {backend} timed out after {timeout:?}")]
    BackendTimeout { backend: BackendId, timeout: Duration },

    #[error("Failed to build upstream request: {0}")]
    RequestBuild(String),
}

impl ProxyError {
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::NoRouteMatch { .. } => "no_route_match",
            Self::BackendUnreachable { .. } => "backend_unreachable",
            Self::BackendTimeout { .. } => "backend_timeout",
            Self::RequestBuild(_) => "request_build_failed",
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NoRouteMatch { .. } => StatusCode::NOT_FOUND,
            Self::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::RequestBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::NoRouteMatch { .. } => "No matching route found",
            Self::BackendUnreachable { .. } => "Upstream request failed",
            Self::BackendTimeout { .. } => "Upstream request timed out",
            Self::RequestBuild(_) => "Internal server error",
        };
        (self.status_code(), message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let no_route = ProxyError::NoRouteMatch { path: "/nope".into() };
        assert_eq!(no_route.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(no_route.error_type(), "no_route_match");

        let unreachable = ProxyError::BackendUnreachable {
            backend: BackendId::Api,
            reason: "connection refused".into(),
        };
        assert_eq!(unreachable.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(unreachable.to_string(), "Backend api unreachable: connection refused");

        let timeout = ProxyError::BackendTimeout {
            backend: BackendId::Cdn,
            timeout: Duration::from_secs(30),
        };
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(timeout.error_type(), "backend_timeout");
    }

    #[test]
    fn test_response_hides_details() {
        let response = ProxyError::BackendUnreachable {
            backend: BackendId::Cdn,
            reason: "10.0.0.1:80 refused".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

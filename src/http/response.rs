//! Proxy error responses.
//!
//! # Responsibilities
//! - Map forwarding failures to HTTP status codes
//! - Render a small JSON error body
//!
//! # Design Decisions
//! - Unreachable or failing upstream results in 502 Bad Gateway
//! - Requests over the configured deadline result in 408 Request Timeout
//! - A target that cannot be turned into a URI is a server-side fault (500)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio::time::error::Elapsed;

use crate::routing::RouteError;

/// Errors raised while forwarding a request upstream.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error(transparent)]
    InvalidTarget(#[from] RouteError),

    #[error("request timed out: {0}")]
    Timeout(#[from] Elapsed),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "statusCode": status.as_u16(),
            "message": status.canonical_reason().unwrap_or("Error"),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn invalid_target_renders_json() {
        let err = ProxyError::InvalidTarget(RouteError::InvalidUri("http://x y".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn timeout_renders_json() {
        let elapsed = tokio::time::timeout(Duration::from_millis(1), std::future::pending::<()>())
            .await
            .unwrap_err();
        let response = ProxyError::from(elapsed).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 408);
        assert_eq!(body["message"], "Request Timeout");
    }
}

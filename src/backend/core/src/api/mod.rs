//! HTTP API for Inkledger.
//!
//! - `GET /health` and `GET /metrics` are unversioned
//! - Everything else lives under `/api/v1`
//!
//! Successful responses are wrapped in [`ApiResponse`]; failures use the
//! [`ErrorResponse`](crate::error::ErrorResponse) shape produced by
//! `InkError`'s `IntoResponse`.

mod handlers;
pub mod v1;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::service::InventoryService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: InventoryService,
    /// Allowed CORS origin; any origin when `None`.
    pub frontend_url: Option<String>,
}

impl AppState {
    pub fn new(service: InventoryService) -> Self {
        Self {
            service,
            frontend_url: None,
        }
    }

    pub fn with_frontend_url(mut self, url: Option<String>) -> Self {
        self.frontend_url = url;
        self
    }
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(err)) => {
            warn!(error = %err, "Invalid frontend_url, allowing any origin");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Build the API router.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(InventoryService::in_memory());
/// let app = build_router(state);
/// ```
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.frontend_url.as_deref());

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::prometheus_metrics))
        .nest(v1::V1_PREFIX, v1::v1_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Success envelope. Failures are rendered by `InkError` itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
    }

    #[test]
    fn test_cors_layer_accepts_bad_origin() {
        let _ = cors_layer(Some("http://localhost:3000"));
        let _ = cors_layer(Some("bad\norigin"));
        let _ = cors_layer(None);
    }
}

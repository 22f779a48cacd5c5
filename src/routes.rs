//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`               - Short code redirect
//! - `GET  /health`               - Health check with store ping
//! - `POST /shorten`              - Issue a short code
//! - `GET|PUT|DELETE /shorten/{code}` - Manage a mapping
//! - `GET  /shorten/{code}/stats` - Access statistics
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Whole-request deadline answered with `408 Request Timeout`
//! - **CORS** - Permissive cross-origin access for browser clients
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
///
/// `request_timeout` bounds the whole request, including every store call the
/// handler makes.
pub fn app_router(state: AppState, request_timeout: Duration) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::routes())
        .with_state(state)
        .layer(cors::layer())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

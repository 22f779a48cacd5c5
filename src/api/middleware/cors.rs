//! Cross-origin resource sharing middleware.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Creates a permissive CORS layer for browser clients.
///
/// Any origin may call the API with the methods the service exposes.
/// Credentials are not allowed.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

//! API route configuration for mapping management.

use crate::api::handlers::{
    create_mapping_handler, delete_mapping_handler, get_mapping_handler, stats_handler,
    update_mapping_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Mapping management routes.
///
/// # Endpoints
///
/// - `POST   /shorten`              - Issue a short code
/// - `GET    /shorten/{code}`       - Retrieve a mapping
/// - `PUT    /shorten/{code}`       - Replace the destination
/// - `DELETE /shorten/{code}`       - Delete a mapping
/// - `GET    /shorten/{code}/stats` - Access statistics
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(create_mapping_handler))
        .route(
            "/shorten/{code}",
            get(get_mapping_handler)
                .put(update_mapping_handler)
                .delete(delete_mapping_handler),
        )
        .route("/shorten/{code}/stats", get(stats_handler))
}

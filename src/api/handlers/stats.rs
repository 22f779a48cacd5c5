//! Handler for per-code access statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::mapping::MappingStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the mapping together with its access count.
///
/// # Endpoint
///
/// `GET /shorten/{code}/stats`
///
/// The count starts at 1 on creation and grows by one per redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MappingStatsResponse>, AppError> {
    let mapping = state.mapping_service.stats(&code).await?;
    let short_url = state.short_url(&mapping.code);

    Ok(Json(MappingStatsResponse::new(mapping, short_url)))
}

//! Handlers for mapping management endpoints (create, retrieve, update, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::mapping::{MappingResponse, MappingStatsResponse};
use crate::api::dto::shorten::ShortenRequest;
use crate::api::dto::update_mapping::UpdateMappingRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a new short code for a destination URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/some/page" }
/// ```
///
/// A destination without a scheme is stored as `https://...`.
///
/// # Response
///
/// `201 Created` with the new mapping. `short_url` is included when
/// `BASE_URL` is configured.
///
/// # Errors
///
/// Returns 400 Bad Request if the body or URL is invalid.
/// Returns 500 Internal Server Error if no free code could be issued.
pub async fn create_mapping_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MappingResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let mapping = state.mapping_service.create(&payload.url).await?;
    let short_url = state.short_url(&mapping.code);

    Ok((
        StatusCode::CREATED,
        Json(MappingResponse::new(mapping, short_url)),
    ))
}

/// Returns the full mapping for a code without counting an access.
///
/// # Endpoint
///
/// `GET /shorten/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn get_mapping_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MappingStatsResponse>, AppError> {
    let mapping = state.mapping_service.retrieve(&code).await?;
    let short_url = state.short_url(&mapping.code);

    Ok(Json(MappingStatsResponse::new(mapping, short_url)))
}

/// Replaces the destination of an existing mapping.
///
/// # Endpoint
///
/// `PUT /shorten/{code}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://new.example.com" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 400 Bad Request if the body or URL is invalid.
pub async fn update_mapping_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateMappingRequest>, JsonRejection>,
) -> Result<Json<MappingResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let mapping = state.mapping_service.update(&code, &payload.url).await?;
    let short_url = state.short_url(&mapping.code);

    Ok(Json(MappingResponse::new(mapping, short_url)))
}

/// Permanently removes a mapping. The code may be issued again later.
///
/// # Endpoint
///
/// `DELETE /shorten/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_mapping_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.mapping_service.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}

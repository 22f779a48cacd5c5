//! Handler for short code redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Validate the code format (no store access for malformed codes)
/// 2. Look up the destination
/// 3. Increment the access counter within its own short budget
/// 4. Return 307 Temporary Redirect
///
/// Repeat visits must reach the service to be counted, so the redirect is
/// never permanent. A failed counter update is logged and does not affect the
/// redirect.
///
/// # Errors
///
/// Returns 400 Bad Request if the code is malformed.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let destination = state.mapping_service.resolve(&code).await?;

    Ok(Redirect::temporary(&destination))
}

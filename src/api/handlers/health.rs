//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable or timed out
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Connected, 42 mappings" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;

    let healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store: store_check },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Pings the store and reports the number of live mappings.
async fn check_store(state: &AppState) -> CheckStatus {
    if let Err(e) = state.mapping_service.health().await {
        tracing::warn!(error = %e, "Store health check failed");
        return CheckStatus {
            status: "error".to_string(),
            message: Some("Store unavailable".to_string()),
        };
    }

    let message = match state.mapping_service.count().await {
        Ok(count) => format!("Connected, {count} mappings"),
        Err(_) => "Connected".to_string(),
    };

    CheckStatus {
        status: "ok".to_string(),
        message: Some(message),
    }
}

//! Application validation route

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use permit_core::{ErrorResponse, PermitApplication, PolicyEngineError, ValidationResult};

use crate::AppState;

/// Map an engine error to an HTTP response
pub(crate) fn error_response(error: PolicyEngineError) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.to_error_response()))
}

/// Validate a permit application
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(application): Json<PermitApplication>,
) -> Result<Json<ValidationResult>, (StatusCode, Json<ErrorResponse>)> {
    tracing::debug!(permit_type = %application.permit_type, "validating application");

    let result = state
        .engine
        .validate(&application)
        .map_err(error_response)?;

    if !result.is_compliant() {
        tracing::info!(
            permit_type = %application.permit_type,
            violations = result.violations.len(),
            "application is non-compliant"
        );
    }

    Ok(Json(result))
}

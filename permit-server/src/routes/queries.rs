//! Policy query routes
//!
//! Thin serialization shims over the engine's query surface. Query
//! operations never fail on unknown codes; they return empty results, so
//! every handler here is infallible except display-code generation, which
//! can reject malformed configurations.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use permit_core::{AxleUnit, ErrorResponse, PermittableVehicles, SizeLimits};

use super::validate::error_response;
use crate::AppState;

/// Summary of a permit type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitTypeSummary {
    pub id: String,
    pub name: String,
}

/// List all permit types
pub async fn permit_types(State(state): State<Arc<AppState>>) -> Json<Vec<PermitTypeSummary>> {
    let summaries = state
        .engine
        .permit_types()
        .iter()
        .map(|p| PermitTypeSummary {
            id: p.id.clone(),
            name: p.name.clone(),
        })
        .collect();
    Json(summaries)
}

/// Query string for the vehicle-types listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypesQuery {
    /// Include non-standard (LCV-only) types
    #[serde(default)]
    pub include_non_standard: bool,
}

/// List vehicle types
pub async fn vehicle_types(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VehicleTypesQuery>,
) -> Json<Value> {
    let vehicles = state.engine.vehicle_types(query.include_non_standard);
    Json(serde_json::to_value(vehicles).unwrap_or(Value::Null))
}

/// Query string for the commodities listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommoditiesQuery {
    /// Restrict to a permit type
    pub permit_type: Option<String>,
}

/// List commodities, optionally filtered by permit type
pub async fn commodities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommoditiesQuery>,
) -> Json<Value> {
    let commodities = state.engine.commodities(query.permit_type.as_deref());
    Json(serde_json::to_value(commodities).unwrap_or(Value::Null))
}

/// List geographic regions
pub async fn regions(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::to_value(state.engine.regions()).unwrap_or(Value::Null))
}

/// Permittable vehicle sets for a permit type
pub async fn permittable_vehicles(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
) -> Json<PermittableVehicles> {
    Json(state.engine.permittable_vehicle_types(&permit_type))
}

/// Request body for the next-vehicles query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextVehiclesRequest {
    #[serde(default)]
    pub commodity: Option<String>,

    /// Vehicle type codes already chosen, in order
    #[serde(default)]
    pub current_configuration: Vec<String>,
}

/// Vehicle types permittable as the next addition
pub async fn next_vehicles(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
    Json(request): Json<NextVehiclesRequest>,
) -> Json<Value> {
    let next = state.engine.next_permittable_vehicles(
        &permit_type,
        request.commodity.as_deref(),
        &request.current_configuration,
    );
    Json(serde_json::to_value(next).unwrap_or(Value::Null))
}

/// Request body for the dimension-limits query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionLimitsRequest {
    #[serde(default)]
    pub commodity: Option<String>,

    #[serde(default)]
    pub vehicle_types: Vec<String>,

    /// Qualifier tags (region codes, season tags)
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

/// Size-dimension limits applicable to a query
pub async fn dimension_limits(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
    Json(request): Json<DimensionLimitsRequest>,
) -> Json<Option<SizeLimits>> {
    Json(state.engine.size_dimension_limits(
        &permit_type,
        request.commodity.as_deref(),
        &request.vehicle_types,
        &request.qualifiers,
    ))
}

/// Request body for display-code generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCodeRequest {
    /// Ordered vehicle type codes
    pub vehicle_types: Vec<String>,

    /// Ordered axle units
    pub axle_configuration: Vec<AxleUnit>,
}

/// Display-code response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCodeResponse {
    pub display_code: String,
}

/// Generate the display code for a vehicle configuration
pub async fn display_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DisplayCodeRequest>,
) -> Result<Json<DisplayCodeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let code = state
        .engine
        .display_code(&request.vehicle_types, &request.axle_configuration)
        .map_err(error_response)?;

    Ok(Json(DisplayCodeResponse { display_code: code }))
}

//! HTTP route handlers

mod queries;
mod validate;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine_version: String,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine_version: permit_core::ENGINE_VERSION.to_string(),
    })
}

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/validate", post(validate::validate))
        .route("/v1/permit-types", get(queries::permit_types))
        .route("/v1/permit-types/:id/vehicles", get(queries::permittable_vehicles))
        .route(
            "/v1/permit-types/:id/next-vehicles",
            post(queries::next_vehicles),
        )
        .route(
            "/v1/permit-types/:id/dimension-limits",
            post(queries::dimension_limits),
        )
        .route("/v1/vehicle-types", get(queries::vehicle_types))
        .route("/v1/commodities", get(queries::commodities))
        .route("/v1/regions", get(queries::regions))
        .route("/v1/display-code", post(queries::display_code))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use permit_core::{PolicyDocument, PolicyEngine};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let document: PolicyDocument = serde_json::from_value(json!({
            "minPEVersion": "0.1.0",
            "vehicleTypes": [
                { "code": "TRKTRAC", "name": "Truck Tractor", "category": "powerUnit", "group": "drive", "displayPrefix": "TT" },
                { "code": "SEMITRL", "name": "Semi Trailer", "category": "trailer", "group": "trailer", "displayPrefix": "ST" }
            ],
            "commodities": [
                { "code": "LOGS", "name": "Logs" }
            ],
            "permitTypes": [
                {
                    "id": "TROS",
                    "name": "Term Oversize",
                    "allowedVehicles": {
                        "powerUnits": ["TRKTRAC"],
                        "trailers": ["SEMITRL"]
                    }
                }
            ]
        }))
        .unwrap();
        let engine = PolicyEngine::new(vec![document]).unwrap();
        Arc::new(AppState::new(engine))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_versions() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn validate_returns_a_validation_result() {
        let app = create_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/v1/validate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "permitType": "TROS",
                    "permitData": {
                        "companyName": "ACME Hauling",
                        "vehicleConfiguration": ["TRKTRAC"],
                        "axleConfiguration": [
                            { "axles": 1, "weight": 5000.0 },
                            { "axles": 1, "weight": 6000.0, "spacing": 4.0 }
                        ]
                    }
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["violations"], json!([]));
    }

    #[tokio::test]
    async fn malformed_display_code_request_maps_to_400() {
        let app = create_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/v1/display-code")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "vehicleTypes": ["TRKTRAC"],
                    "axleConfiguration": [ { "axles": 1, "weight": 0.0 } ]
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MISMATCHED_CONFIGURATION");
    }

    #[tokio::test]
    async fn permittable_vehicles_query() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/permit-types/TROS/vehicles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["powerUnits"], json!(["TRKTRAC"]));
        assert_eq!(body["trailers"], json!(["SEMITRL"]));
    }
}

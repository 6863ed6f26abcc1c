//! # Permit Core - Commercial Vehicle Permitting Policy Engine
//!
//! A declarative policy engine for commercial-vehicle permitting: given a
//! versioned policy definition (permit types, vehicle and commodity tables,
//! weight and size limits, rule trees) and a permit application, it decides
//! whether the application is compliant, which violations and warnings
//! apply, what the permit costs, and which conditions attach. It also
//! answers structural queries against the policy itself: permittable
//! vehicle types, the legal next vehicle for a partial configuration, and
//! compact display codes for vehicle configurations.
//!
//! ## Core Principle
//!
//! > The policy document decides; the engine only interprets.
//!
//! Ambiguous or missing policy data is a configuration error at
//! construction time, never a guess at validation time.
//!
//! ## Example
//!
//! ```rust
//! use permit_core::{PolicyEngine, PermitApplication};
//!
//! let policy = r#"{
//!     "minPEVersion": "0.1.0",
//!     "name": "Base policy",
//!     "vehicleTypes": [
//!         { "code": "TRKTRAC", "name": "Truck Tractor",
//!           "category": "powerUnit", "group": "drive", "displayPrefix": "TT" }
//!     ],
//!     "commodities": [
//!         { "code": "LOGS", "name": "Logs" }
//!     ],
//!     "permitTypes": [
//!         { "id": "TROS", "name": "Term Oversize",
//!           "allowedVehicles": { "powerUnits": ["TRKTRAC"] } }
//!     ]
//! }"#;
//!
//! // Construct an engine (runs the version gate and invariant checks)
//! let engine = PolicyEngine::from_json_documents(&[policy]).unwrap();
//!
//! // Validate an application
//! let application: PermitApplication = serde_json::from_str(r#"{
//!     "permitType": "TROS",
//!     "permitData": {
//!         "companyName": "ACME Hauling",
//!         "vehicleConfiguration": ["TRKTRAC"],
//!         "axleConfiguration": [
//!             { "axles": 1, "weight": 5500.0 },
//!             { "axles": 2, "weight": 17000.0, "spacing": 3.6 }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let result = engine.validate(&application).unwrap();
//! assert!(result.is_compliant());
//!
//! // Query the policy structure
//! let permittable = engine.permittable_vehicle_types("TROS");
//! assert_eq!(permittable.power_units, vec!["TRKTRAC"]);
//! ```

pub mod application;
pub mod axle;
pub mod definition;
pub mod display;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod rules;
pub mod validation;

// Re-export main types
pub use application::{PermitApplication, PermitData};
pub use axle::{AxleCalcResults, AxleCheck, AxleUnit, CheckKind, WeightDefaults};
pub use definition::{
    Commodity, CommodityScope, GroupClassifier, PermitType, PolicyDefinition, PolicyDocument,
    Region, SizeLimits, VehicleCategory, VehicleType, ENGINE_VERSION,
};
pub use display::DisplayDefaults;
pub use engine::PolicyEngine;
pub use error::{ErrorCategory, ErrorResponse, PolicyEngineError, Result};
pub use resolver::PermittableVehicles;
pub use rules::{ComparisonOperator, ConditionNode, Consequence, FactSet, Rule};
pub use validation::{CostLine, PermitCondition, ValidationOutcome, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_workflow() {
        let base = json!({
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
                    "commodities": "all",
                    "allowedVehicles": {
                        "powerUnits": ["TRKTRAC"],
                        "trailers": ["SEMITRL"]
                    }
                }
            ]
        });

        let document: PolicyDocument = serde_json::from_value(base).unwrap();
        let engine = PolicyEngine::new(vec![document]).unwrap();

        // query side
        let permittable = engine.permittable_vehicle_types("TROS");
        assert_eq!(permittable.power_units.len(), 1);
        assert_eq!(permittable.trailers.len(), 1);

        let code = engine
            .display_code(
                &["TRKTRAC".to_string(), "SEMITRL".to_string()],
                &[
                    AxleUnit::new(1, 5_500.0),
                    AxleUnit::new(2, 17_000.0),
                    AxleUnit::new(3, 24_000.0),
                ],
            )
            .unwrap();
        assert_eq!(code, "TT1S12D2ST3T3");

        // validation side
        let application: PermitApplication = serde_json::from_value(json!({
            "permitType": "TROS",
            "permitData": {
                "companyName": "ACME Hauling",
                "vehicleConfiguration": ["TRKTRAC", "SEMITRL"],
                "axleConfiguration": [
                    { "axles": 1, "weight": 5500.0 },
                    { "axles": 2, "weight": 17000.0, "spacing": 3.6 },
                    { "axles": 3, "weight": 24000.0, "spacing": 6.2 }
                ]
            }
        }))
        .unwrap();

        let result = engine.validate(&application).unwrap();
        assert!(result.is_compliant(), "violations: {:?}", result.violations);
    }

    #[test]
    fn test_version_gate_runs_before_model_construction() {
        // dangling references never get checked when the gate fails
        let document = json!({
            "minPEVersion": "99.0.0",
            "permitTypes": [
                { "id": "TROS", "name": "Term Oversize",
                  "allowedVehicles": { "powerUnits": ["GHOST"] } }
            ]
        })
        .to_string();

        let err = PolicyEngine::from_json_documents(&[&document]).unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_VERSION_TOO_OLD");
    }
}

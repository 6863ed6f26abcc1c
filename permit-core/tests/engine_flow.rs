//! Integration test covering the full engine flow: layered document
//! construction, the version gate, overlay merging, validation, and the
//! query surface working together.

use permit_core::{PermitApplication, PolicyDocument, PolicyEngine};
use serde_json::json;

fn base_policy() -> serde_json::Value {
    json!({
        "minPEVersion": "0.1.0",
        "name": "Base commercial vehicle policy",
        "vehicleTypes": [
            { "code": "TRKTRAC", "name": "Truck Tractor", "category": "powerUnit", "group": "drive", "displayPrefix": "TT" },
            { "code": "PICKERT", "name": "Picker Truck", "category": "powerUnit", "group": "drive", "displayPrefix": "PT" },
            { "code": "SEMITRL", "name": "Semi Trailer", "category": "trailer", "group": "trailer", "displayPrefix": "ST" },
            { "code": "PONYTRL", "name": "Pony Trailer", "category": "trailer", "group": "trailer", "displayPrefix": "PY" },
            { "code": "JEEPSRG", "name": "Jeep", "category": "jeep", "group": "jeep", "displayPrefix": "JP" }
        ],
        "commodities": [
            { "code": "LOGS", "name": "Logs", "weightFactor": 1.1 },
            { "code": "BEAMS", "name": "Beams" }
        ],
        "regions": [
            { "code": "PCE", "name": "Peace" }
        ],
        "permitTypes": [
            {
                "id": "TROS",
                "name": "Term Oversize",
                "commodities": "all",
                "allowedVehicles": {
                    "powerUnits": ["TRKTRAC", "PICKERT"],
                    "trailers": ["SEMITRL", "PONYTRL", "JEEPSRG"]
                },
                "rules": [
                    {
                        "id": "expiry-after-start",
                        "condition": {
                            "type": "compare",
                            "fact": "permitData.expiryDate",
                            "op": "date-less-than",
                            "value": { "fact": "permitData.startDate" }
                        },
                        "consequence": {
                            "type": "violation",
                            "code": "EXPIRY_BEFORE_START",
                            "message": "Expiry date precedes the start date"
                        }
                    },
                    {
                        "id": "term-fee",
                        "condition": { "type": "allOf", "conditions": [] },
                        "consequence": {
                            "type": "cost",
                            "description": "Term oversize fee",
                            "amount": 30.0
                        }
                    }
                ]
            }
        ]
    })
}

fn lcv_overlay() -> serde_json::Value {
    json!({
        "minPEVersion": "0.1.0",
        "name": "LCV special authorization",
        "vehicleTypes": [
            { "code": "LCVRMDB", "name": "Rocky Mountain Double", "category": "powerUnit", "group": "drive", "displayPrefix": "RM", "lcvOnly": true }
        ],
        "permitTypes": [
            {
                "id": "TROS",
                "name": "",
                "allowedVehicles": { "powerUnits": ["LCVRMDB"] },
                "rules": [
                    {
                        "id": "lcv-conditions",
                        "condition": {
                            "type": "compare",
                            "fact": "permitData.vehicleConfiguration.0",
                            "op": "equal",
                            "value": "LCVRMDB"
                        },
                        "consequence": {
                            "type": "condition",
                            "code": "CVSE-1049",
                            "description": "LCV pre-approved route restrictions apply"
                        }
                    }
                ]
            }
        ]
    })
}

fn engine_with_overlay() -> PolicyEngine {
    let base: PolicyDocument = serde_json::from_value(base_policy()).unwrap();
    let overlay: PolicyDocument = serde_json::from_value(lcv_overlay()).unwrap();
    PolicyEngine::new(vec![base, overlay]).unwrap()
}

#[test]
fn permittable_sets_grow_under_overlay_and_only_grow() {
    // base alone: 2 power units, 3 trailers
    let base: PolicyDocument = serde_json::from_value(base_policy()).unwrap();
    let engine = PolicyEngine::new(vec![base]).unwrap();
    let permittable = engine.permittable_vehicle_types("TROS");
    assert_eq!(permittable.power_units.len(), 2);
    assert_eq!(permittable.trailers.len(), 3);

    // with the special-authorization overlay: 3 power units, trailers untouched
    let engine = engine_with_overlay();
    let permittable = engine.permittable_vehicle_types("TROS");
    assert_eq!(permittable.power_units.len(), 3);
    assert_eq!(permittable.trailers.len(), 3);
    assert!(permittable.power_units.contains(&"LCVRMDB".to_string()));
}

#[test]
fn version_gate_one_major_ahead_fails_construction() {
    let mut document = base_policy();
    document["minPEVersion"] = json!("1.1.0");

    let parsed: PolicyDocument = serde_json::from_value(document).unwrap();
    let err = PolicyEngine::new(vec![parsed]).unwrap_err();
    assert_eq!(err.error_code(), "ENGINE_VERSION_TOO_OLD");
}

#[test]
fn gate_applies_to_every_document_in_the_set() {
    let base: PolicyDocument = serde_json::from_value(base_policy()).unwrap();
    let mut overlay = lcv_overlay();
    overlay["minPEVersion"] = json!("7.0.0");
    let overlay: PolicyDocument = serde_json::from_value(overlay).unwrap();

    let err = PolicyEngine::new(vec![base, overlay]).unwrap_err();
    assert_eq!(err.error_code(), "ENGINE_VERSION_TOO_OLD");
}

#[test]
fn lcv_vehicle_is_only_compliant_with_the_overlay_loaded() {
    let application: PermitApplication = serde_json::from_value(json!({
        "permitType": "TROS",
        "permitData": {
            "companyName": "ACME Hauling",
            "vehicleConfiguration": ["LCVRMDB", "SEMITRL"],
            "axleConfiguration": [
                { "axles": 1, "weight": 5500.0 },
                { "axles": 2, "weight": 17000.0, "spacing": 3.6 },
                { "axles": 2, "weight": 16000.0, "spacing": 6.0 }
            ]
        }
    }))
    .unwrap();

    // base only: the LCV type exists nowhere, so it is an unknown vehicle
    let base: PolicyDocument = serde_json::from_value(base_policy()).unwrap();
    let engine = PolicyEngine::new(vec![base]).unwrap();
    let result = engine.validate(&application).unwrap();
    assert!(result
        .violations
        .iter()
        .any(|v| v.code == "VEHICLE_TYPE_UNKNOWN"));

    // with the overlay: compliant, and the LCV condition attaches
    let engine = engine_with_overlay();
    let result = engine.validate(&application).unwrap();
    assert!(result.is_compliant(), "violations: {:?}", result.violations);
    assert!(result.conditions.iter().any(|c| c.code == "CVSE-1049"));
    // base rules still run under the overlay
    assert_eq!(result.total_cost(), 30.0);
}

#[test]
fn date_rule_uses_fact_to_fact_comparison() {
    let engine = engine_with_overlay();
    let application: PermitApplication = serde_json::from_value(json!({
        "permitType": "TROS",
        "permitData": {
            "companyName": "ACME Hauling",
            "startDate": "2026-06-01",
            "expiryDate": "2026-05-01",
            "vehicleConfiguration": ["TRKTRAC"],
            "axleConfiguration": [
                { "axles": 1, "weight": 5000.0 },
                { "axles": 1, "weight": 6000.0, "spacing": 4.0 }
            ]
        }
    }))
    .unwrap();

    let result = engine.validate(&application).unwrap();
    assert!(result
        .violations
        .iter()
        .any(|v| v.code == "EXPIRY_BEFORE_START"));
}

#[test]
fn next_vehicle_query_reflects_overlay_and_sequencing() {
    let engine = engine_with_overlay();

    // nothing chosen yet: power units only, including the LCV type
    let first = engine.next_permittable_vehicles("TROS", None, &[]);
    let codes: Vec<&str> = first.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["TRKTRAC", "PICKERT", "LCVRMDB"]);

    // after a power unit: trailers and jeeps, never another power unit
    let next =
        engine.next_permittable_vehicles("TROS", None, &["TRKTRAC".to_string()]);
    let codes: Vec<&str> = next.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["SEMITRL", "PONYTRL", "JEEPSRG"]);
}

#[test]
fn query_operations_never_error_on_unknown_codes() {
    let engine = engine_with_overlay();

    assert!(engine.permittable_vehicle_types("NOPE").power_units.is_empty());
    assert!(engine.next_permittable_vehicles("NOPE", None, &[]).is_empty());
    assert!(engine.commodities(Some("NOPE")).is_empty());
    assert!(engine
        .size_dimension_limits("NOPE", None, &[], &[])
        .is_none());
}

#[test]
fn validation_calls_are_independent() {
    let engine = engine_with_overlay();

    let bad = PermitApplication::new("MYSTERY");
    let bad_result = engine.validate(&bad).unwrap();
    assert!(!bad_result.is_compliant());

    // a failed validation leaves no trace in the next one
    let good: PermitApplication = serde_json::from_value(json!({
        "permitType": "TROS",
        "permitData": {
            "companyName": "ACME Hauling",
            "vehicleConfiguration": ["TRKTRAC"],
            "axleConfiguration": [
                { "axles": 1, "weight": 5000.0 },
                { "axles": 1, "weight": 6000.0, "spacing": 4.0 }
            ]
        }
    }))
    .unwrap();
    let result = engine.validate(&good).unwrap();
    assert!(result.is_compliant(), "violations: {:?}", result.violations);
}

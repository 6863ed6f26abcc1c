//! Permit application input types
//!
//! The structured document a caller submits for validation. Everything here
//! is per-call and caller-owned; the engine never retains it. Unmodeled
//! fields are kept in `extra` so declarative rules can reference
//! application data the core does not interpret itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::axle::AxleUnit;

/// A permit application submitted for validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitApplication {
    /// Permit type being applied for (e.g., "TROS")
    pub permit_type: String,

    /// Permit-specific data
    #[serde(default)]
    pub permit_data: PermitData,
}

impl PermitApplication {
    /// Create an application with empty permit data
    pub fn new(permit_type: &str) -> Self {
        Self {
            permit_type: permit_type.to_string(),
            permit_data: PermitData::default(),
        }
    }
}

/// Permit-specific application data
///
/// Start date defaults are the caller's responsibility; the engine only
/// reads the dates it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitData {
    /// Applicant company name
    #[serde(default)]
    pub company_name: String,

    /// Commodity being carried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,

    /// Permit start date, policy date format (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Permit expiry date, policy date format (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// Ordered vehicle type codes of the combination
    #[serde(default)]
    pub vehicle_configuration: Vec<String>,

    /// Ordered axle units, consumed left-to-right across the vehicles
    #[serde(default)]
    pub axle_configuration: Vec<AxleUnit>,

    /// Region codes the permit applies to
    #[serde(default)]
    pub regions: Vec<String>,

    /// Application fields the core does not interpret; addressable as facts
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_deserializes_with_extras() {
        let application: PermitApplication = serde_json::from_value(json!({
            "permitType": "TROS",
            "permitData": {
                "companyName": "ACME Hauling",
                "commodity": "LOGS",
                "startDate": "2026-03-01",
                "vehicleConfiguration": ["TRKTRAC", "SEMITRL"],
                "axleConfiguration": [
                    { "axles": 1, "weight": 5500.0 },
                    { "axles": 2, "weight": 17000.0, "spacing": 3.6 }
                ],
                "loadedDimensions": { "width": 3.2 }
            }
        }))
        .unwrap();

        assert_eq!(application.permit_type, "TROS");
        assert_eq!(application.permit_data.vehicle_configuration.len(), 2);
        assert_eq!(application.permit_data.axle_configuration[1].axles, 2);
        assert!(application.permit_data.extra.contains_key("loadedDimensions"));
    }

    #[test]
    fn test_extras_survive_serialization_as_facts() {
        let application: PermitApplication = serde_json::from_value(json!({
            "permitType": "TROS",
            "permitData": { "projectNumber": "P-1138" }
        }))
        .unwrap();

        let value = serde_json::to_value(&application).unwrap();
        assert_eq!(value["permitData"]["projectNumber"], json!("P-1138"));
    }
}

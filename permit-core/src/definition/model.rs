//! Merged policy definition model
//!
//! [`PolicyDefinition`] is the immutable aggregate built once at engine
//! construction from an ordered list of policy documents,
//! most-general-first. It owns the merged entity tables and answers every
//! structural lookup; after construction it is read-only, which is what
//! makes concurrent validation calls safe without coordination.
//!
//! Merge rule: whole-entity tables (vehicle types, commodities, regions,
//! sequencing) replace per code, later document wins, original position
//! preserved. Permit types merge deep: scalars replace when present,
//! permittable-vehicle lists union, rules and dimension tables append. The
//! deep merge is what lets a special-authorization overlay extend a base
//! permit type without restating it.

use crate::axle::WeightDefaults;
use crate::display::DisplayDefaults;
use crate::error::{PolicyEngineError, Result};

use super::document::{
    Commodity, CommodityScope, PermitType, PolicyDocument, Region, SequencingRule, VehicleCategory,
    VehicleType,
};

/// The merged, immutable policy definition
#[derive(Debug, Clone)]
pub struct PolicyDefinition {
    permit_types: Vec<PermitType>,
    vehicle_types: Vec<VehicleType>,
    commodities: Vec<Commodity>,
    regions: Vec<Region>,
    sequencing: Vec<SequencingRule>,
    display_defaults: DisplayDefaults,
    weight_defaults: WeightDefaults,
}

impl PolicyDefinition {
    /// Merge an ordered document list into one definition
    ///
    /// Documents are supplied most-general-first, most-specific-last. Each
    /// document must be structurally valid, and the merged result must
    /// satisfy every cross-reference invariant; either failure is a
    /// configuration error naming the offenders.
    pub fn from_documents(documents: Vec<PolicyDocument>) -> Result<Self> {
        if documents.is_empty() {
            return Err(PolicyEngineError::InvalidPolicyDocument {
                reason: "at least one policy document is required".to_string(),
            });
        }

        for document in &documents {
            document
                .validate()
                .map_err(|errors| PolicyEngineError::InvalidPolicyDocument {
                    reason: errors.join("; "),
                })?;
        }

        let mut definition = PolicyDefinition {
            permit_types: vec![],
            vehicle_types: vec![],
            commodities: vec![],
            regions: vec![],
            sequencing: vec![],
            display_defaults: DisplayDefaults::default(),
            weight_defaults: WeightDefaults::default(),
        };

        for document in documents {
            definition.merge_document(document);
        }

        definition.check_cross_references()?;

        Ok(definition)
    }

    fn merge_document(&mut self, document: PolicyDocument) {
        for vehicle in document.vehicle_types {
            let code = vehicle.code.clone();
            upsert(&mut self.vehicle_types, |v| v.code == code, vehicle);
        }
        for commodity in document.commodities {
            let code = commodity.code.clone();
            upsert(&mut self.commodities, |c| c.code == code, commodity);
        }
        for region in document.regions {
            let code = region.code.clone();
            upsert(&mut self.regions, |r| r.code == code, region);
        }
        for rule in document.sequencing {
            let category = rule.category;
            upsert(&mut self.sequencing, |s| s.category == category, rule);
        }

        for permit_type in document.permit_types {
            match self.permit_types.iter().position(|p| p.id == permit_type.id) {
                Some(index) => merge_permit_type(&mut self.permit_types[index], permit_type),
                None => self.permit_types.push(permit_type),
            }
        }

        if let Some(defaults) = document.display_defaults {
            self.display_defaults = defaults;
        }
        if let Some(defaults) = document.weight_defaults {
            self.weight_defaults = defaults;
        }
    }

    fn check_cross_references(&self) -> Result<()> {
        let mut errors = vec![];

        for permit_type in &self.permit_types {
            for code in permit_type.all_vehicle_codes() {
                if self.vehicle_type(code).is_none() {
                    errors.push(format!(
                        "permit type '{}' references unknown vehicle type '{}'",
                        permit_type.id, code
                    ));
                }
            }

            if let Some(CommodityScope::Listed(codes)) = &permit_type.commodities {
                for code in codes {
                    if self.commodity(code).is_none() {
                        errors.push(format!(
                            "permit type '{}' references unknown commodity '{}'",
                            permit_type.id, code
                        ));
                    }
                }
            }

            for (i, limit) in permit_type.dimension_limits.iter().enumerate() {
                for code in &limit.commodities {
                    if self.commodity(code).is_none() {
                        errors.push(format!(
                            "permit type '{}' dimension limit {} references unknown commodity '{}'",
                            permit_type.id, i, code
                        ));
                    }
                }
                for code in &limit.vehicle_types {
                    if self.vehicle_type(code).is_none() {
                        errors.push(format!(
                            "permit type '{}' dimension limit {} references unknown vehicle type '{}'",
                            permit_type.id, i, code
                        ));
                    }
                }
            }
        }

        for commodity in &self.commodities {
            for id in &commodity.permit_types {
                if self.permit_type(id).is_none() {
                    errors.push(format!(
                        "commodity '{}' references unknown permit type '{}'",
                        commodity.code, id
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PolicyEngineError::InvalidPolicyDocument {
                reason: errors.join("; "),
            })
        }
    }

    /// Get a permit type by ID
    pub fn permit_type(&self, id: &str) -> Option<&PermitType> {
        self.permit_types.iter().find(|p| p.id == id)
    }

    /// Get a vehicle type by code
    pub fn vehicle_type(&self, code: &str) -> Option<&VehicleType> {
        self.vehicle_types.iter().find(|v| v.code == code)
    }

    /// Get a commodity by code
    pub fn commodity(&self, code: &str) -> Option<&Commodity> {
        self.commodities.iter().find(|c| c.code == code)
    }

    /// Get a region by code
    pub fn region(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// All permit types, in merged declaration order
    pub fn permit_types(&self) -> &[PermitType] {
        &self.permit_types
    }

    /// All vehicle types, in merged declaration order
    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    /// All commodities, in merged declaration order
    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    /// All regions, in merged declaration order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Display-code regulatory constants in effect
    pub fn display_defaults(&self) -> &DisplayDefaults {
        &self.display_defaults
    }

    /// Weight-check regulatory constants in effect
    pub fn weight_defaults(&self) -> &WeightDefaults {
        &self.weight_defaults
    }

    /// Commodities applicable to a permit type, ordered and duplicate-free
    ///
    /// A listed scope keeps its declared order; an unlisted scope walks the
    /// commodity table, honoring each commodity's own permit-type
    /// association. Unknown permit types yield an empty result.
    pub fn commodities_for_permit_type(&self, id: &str) -> Vec<&Commodity> {
        let Some(permit_type) = self.permit_type(id) else {
            return vec![];
        };

        match &permit_type.commodities {
            Some(CommodityScope::Listed(codes)) => {
                let mut seen = std::collections::HashSet::new();
                codes
                    .iter()
                    .filter(|code| seen.insert(code.as_str()))
                    .filter_map(|code| self.commodity(code))
                    .collect()
            }
            None | Some(CommodityScope::All) => self
                .commodities
                .iter()
                .filter(|c| c.permit_types.is_empty() || c.permit_types.iter().any(|p| p == id))
                .collect(),
        }
    }

    /// Vehicle types applicable to a permit type, power units first,
    /// ordered and duplicate-free
    pub fn vehicle_types_for_permit_type(&self, id: &str) -> Vec<&VehicleType> {
        let Some(permit_type) = self.permit_type(id) else {
            return vec![];
        };

        let mut seen = std::collections::HashSet::new();
        permit_type
            .all_vehicle_codes()
            .filter(|code| seen.insert(*code))
            .filter_map(|code| self.vehicle_type(code))
            .collect()
    }

    /// Categories a vehicle category may immediately follow
    ///
    /// A declared sequencing rule replaces the built-in default for its
    /// category; an empty result means the category must lead.
    pub fn category_follows(&self, category: VehicleCategory) -> Vec<VehicleCategory> {
        if let Some(rule) = self.sequencing.iter().find(|s| s.category == category) {
            return rule.follows.clone();
        }

        match category {
            VehicleCategory::PowerUnit => vec![],
            VehicleCategory::Jeep => vec![VehicleCategory::PowerUnit, VehicleCategory::Jeep],
            VehicleCategory::Trailer => vec![VehicleCategory::PowerUnit, VehicleCategory::Jeep],
            VehicleCategory::Booster => vec![VehicleCategory::Trailer, VehicleCategory::Booster],
            VehicleCategory::Dolly => vec![VehicleCategory::Trailer],
        }
    }
}

fn upsert<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool, item: T) {
    match items.iter().position(|existing| matches(existing)) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

fn merge_permit_type(base: &mut PermitType, overlay: PermitType) {
    if !overlay.name.is_empty() {
        base.name = overlay.name;
    }

    if let Some(overlay_scope) = overlay.commodities {
        base.commodities = Some(match (base.commodities.take(), overlay_scope) {
            (Some(CommodityScope::Listed(mut existing)), CommodityScope::Listed(added)) => {
                extend_unique(&mut existing, added);
                CommodityScope::Listed(existing)
            }
            (_, scope) => scope,
        });
    }

    extend_unique(
        &mut base.allowed_vehicles.power_units,
        overlay.allowed_vehicles.power_units,
    );
    extend_unique(
        &mut base.allowed_vehicles.trailers,
        overlay.allowed_vehicles.trailers,
    );

    base.dimension_limits.extend(overlay.dimension_limits);
    base.rules.extend(overlay.rules);
}

fn extend_unique(dst: &mut Vec<String>, src: Vec<String>) {
    for item in src {
        if !dst.contains(&item) {
            dst.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_document() -> PolicyDocument {
        serde_json::from_value(json!({
            "minPEVersion": "0.1.0",
            "name": "Base policy",
            "vehicleTypes": [
                { "code": "TRKTRAC", "name": "Truck Tractor", "category": "powerUnit", "group": "drive", "displayPrefix": "TT" },
                { "code": "PICKERT", "name": "Picker Truck", "category": "powerUnit", "group": "drive", "displayPrefix": "PT" },
                { "code": "SEMITRL", "name": "Semi Trailer", "category": "trailer", "group": "trailer" },
                { "code": "PONYTRL", "name": "Pony Trailer", "category": "trailer", "group": "trailer" },
                { "code": "JEEPSRG", "name": "Jeep", "category": "jeep", "group": "jeep" }
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
                    }
                }
            ]
        }))
        .unwrap()
    }

    fn lcv_overlay() -> PolicyDocument {
        serde_json::from_value(json!({
            "minPEVersion": "0.1.0",
            "name": "LCV special authorization",
            "vehicleTypes": [
                { "code": "LCVRMDB", "name": "Rocky Mountain Double", "category": "powerUnit", "group": "drive", "lcvOnly": true }
            ],
            "permitTypes": [
                {
                    "id": "TROS",
                    "name": "",
                    "allowedVehicles": { "powerUnits": ["LCVRMDB"] }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_single_document_definition() {
        let definition = PolicyDefinition::from_documents(vec![base_document()]).unwrap();
        assert_eq!(definition.permit_types().len(), 1);
        assert!(definition.vehicle_type("TRKTRAC").is_some());
        assert!(definition.vehicle_type("NOPE").is_none());
        assert!(definition.region("PCE").is_some());
    }

    #[test]
    fn test_overlay_extends_permittable_vehicles() {
        let definition =
            PolicyDefinition::from_documents(vec![base_document(), lcv_overlay()]).unwrap();

        let permit_type = definition.permit_type("TROS").unwrap();
        assert_eq!(
            permit_type.allowed_vehicles.power_units,
            vec!["TRKTRAC", "PICKERT", "LCVRMDB"]
        );
        // trailers preserved, name not clobbered by the overlay's empty name
        assert_eq!(permit_type.allowed_vehicles.trailers.len(), 3);
        assert_eq!(permit_type.name, "Term Oversize");
    }

    #[test]
    fn test_later_entity_entries_replace_earlier() {
        let mut overlay = PolicyDocument::builder("0.1.0").build();
        overlay.commodities.push(Commodity {
            code: "LOGS".to_string(),
            name: "Timber".to_string(),
            permit_types: vec![],
            weight_factor: Some(1.25),
        });

        let definition =
            PolicyDefinition::from_documents(vec![base_document(), overlay]).unwrap();
        let logs = definition.commodity("LOGS").unwrap();
        assert_eq!(logs.name, "Timber");
        assert_eq!(logs.weight_factor, Some(1.25));
        // replacement keeps the original table position
        assert_eq!(definition.commodities()[0].code, "LOGS");
    }

    #[test]
    fn test_dangling_vehicle_reference_fails_construction() {
        let mut document = base_document();
        document.permit_types[0]
            .allowed_vehicles
            .power_units
            .push("GHOST".to_string());

        let err = PolicyDefinition::from_documents(vec![document]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_POLICY_DOCUMENT");
        assert!(err.to_string().contains("GHOST"));
        assert!(err.to_string().contains("TROS"));
    }

    #[test]
    fn test_dangling_commodity_reference_fails_construction() {
        let mut document = base_document();
        document.permit_types[0].commodities =
            Some(CommodityScope::Listed(vec!["UNOBTAINIUM".to_string()]));

        let err = PolicyDefinition::from_documents(vec![document]).unwrap_err();
        assert!(err.to_string().contains("UNOBTAINIUM"));
    }

    #[test]
    fn test_empty_document_list_is_rejected() {
        let err = PolicyDefinition::from_documents(vec![]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_POLICY_DOCUMENT");
    }

    #[test]
    fn test_commodities_for_permit_type() {
        let definition = PolicyDefinition::from_documents(vec![base_document()]).unwrap();
        let commodities = definition.commodities_for_permit_type("TROS");
        let codes: Vec<&str> = commodities.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["LOGS", "BEAMS"]);

        assert!(definition.commodities_for_permit_type("UNKNOWN").is_empty());
    }

    #[test]
    fn test_listed_commodity_scope_keeps_declared_order() {
        let mut document = base_document();
        document.permit_types[0].commodities = Some(CommodityScope::Listed(vec![
            "BEAMS".to_string(),
            "LOGS".to_string(),
            "BEAMS".to_string(),
        ]));

        let definition = PolicyDefinition::from_documents(vec![document]).unwrap();
        let codes: Vec<&str> = definition
            .commodities_for_permit_type("TROS")
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(codes, vec!["BEAMS", "LOGS"]);
    }

    #[test]
    fn test_vehicle_types_for_permit_type_power_units_first() {
        let definition = PolicyDefinition::from_documents(vec![base_document()]).unwrap();
        let vehicles = definition.vehicle_types_for_permit_type("TROS");
        let codes: Vec<&str> = vehicles.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["TRKTRAC", "PICKERT", "SEMITRL", "PONYTRL", "JEEPSRG"]
        );
    }

    #[test]
    fn test_default_sequencing() {
        let definition = PolicyDefinition::from_documents(vec![base_document()]).unwrap();
        assert!(definition.category_follows(VehicleCategory::PowerUnit).is_empty());
        assert_eq!(
            definition.category_follows(VehicleCategory::Trailer),
            vec![VehicleCategory::PowerUnit, VehicleCategory::Jeep]
        );
        assert_eq!(
            definition.category_follows(VehicleCategory::Booster),
            vec![VehicleCategory::Trailer, VehicleCategory::Booster]
        );
    }

    #[test]
    fn test_declared_sequencing_replaces_default() {
        let mut document = base_document();
        document.sequencing.push(SequencingRule {
            category: VehicleCategory::Trailer,
            follows: vec![VehicleCategory::PowerUnit],
        });

        let definition = PolicyDefinition::from_documents(vec![document]).unwrap();
        assert_eq!(
            definition.category_follows(VehicleCategory::Trailer),
            vec![VehicleCategory::PowerUnit]
        );
    }

    #[test]
    fn test_defaults_blocks_override() {
        let mut overlay = PolicyDocument::builder("0.1.0").build();
        overlay.weight_defaults = Some(WeightDefaults {
            max_axle_weight_kg: 11_000.0,
            ..WeightDefaults::default()
        });

        let definition =
            PolicyDefinition::from_documents(vec![base_document(), overlay]).unwrap();
        assert_eq!(definition.weight_defaults().max_axle_weight_kg, 11_000.0);
        // display defaults untouched
        assert_eq!(definition.display_defaults().standard_max_unit_axles, 4);
    }
}

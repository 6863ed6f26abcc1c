//! Policy engine facade
//!
//! [`PolicyEngine`] is the surface external adapters call: construct from
//! policy documents, validate applications, and answer structural queries.
//! Construction runs the version gate and builds the merged definition;
//! after that the engine is read-only, so one instance may serve concurrent
//! callers without coordination.

use std::collections::HashSet;

use serde_json::json;

use crate::application::PermitApplication;
use crate::axle::{self, AxleUnit};
use crate::definition::{
    self, Commodity, PermitType, PolicyDefinition, PolicyDocument, Region, SizeLimits, VehicleType,
};
use crate::display;
use crate::error::{PolicyEngineError, Result};
use crate::resolver::{self, PermittableVehicles};
use crate::rules::{evaluate_rules, FactSet};
use crate::validation::ValidationResult;

/// The permit policy engine
///
/// Built once from an ordered document list (most-general-first,
/// most-specific-last) and immutable afterwards.
#[derive(Debug)]
pub struct PolicyEngine {
    definition: PolicyDefinition,
}

impl PolicyEngine {
    /// Construct an engine from policy documents
    ///
    /// Runs the version compatibility gate on every document, merges them
    /// into one definition, and checks every cross-reference invariant.
    /// Any failure is a configuration error and no engine is created.
    pub fn new(documents: Vec<PolicyDocument>) -> Result<Self> {
        for document in &documents {
            definition::check_minimum(&document.min_engine_version)?;
        }

        let definition = PolicyDefinition::from_documents(documents)?;

        Ok(Self { definition })
    }

    /// Construct an engine from raw JSON documents
    pub fn from_json_documents(documents: &[&str]) -> Result<Self> {
        let parsed = documents
            .iter()
            .map(|json| PolicyDocument::from_json(json))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }

    /// The merged policy definition
    pub fn definition(&self) -> &PolicyDefinition {
        &self.definition
    }

    /// Validate a permit application
    ///
    /// Returns `Err` only for input-shape problems (empty permit type, zero
    /// axle counts). Unknown codes in application data, weight failures,
    /// and rule hits are violations and warnings inside the `Ok` result.
    pub fn validate(&self, application: &PermitApplication) -> Result<ValidationResult> {
        if application.permit_type.is_empty() {
            return Err(PolicyEngineError::MissingApplicationField {
                field: "permitType".to_string(),
            });
        }
        for (i, unit) in application.permit_data.axle_configuration.iter().enumerate() {
            if unit.axles == 0 {
                return Err(PolicyEngineError::InvalidAxleConfiguration {
                    reason: format!("axle unit {} has zero axles", i + 1),
                });
            }
        }

        let mut result = ValidationResult::new();

        let Some(permit_type) = self.definition.permit_type(&application.permit_type) else {
            result.add_violation(
                "PERMIT_TYPE_UNKNOWN",
                format!(
                    "permit type '{}' is not defined in policy",
                    application.permit_type
                ),
            );
            return Ok(result);
        };

        self.check_vehicles(permit_type, application, &mut result);
        let weight_factor = self.check_commodity(permit_type, application, &mut result);
        self.check_regions(application, &mut result);

        let calc = axle::calculate(
            &application.permit_data.axle_configuration,
            self.definition.weight_defaults(),
            weight_factor,
        )?;

        let mut facts = FactSet::new(serde_json::to_value(application)?);
        facts.set_top_level("axleCalculation", calc.to_facts());
        facts.set_top_level(
            "commodity",
            json!({
                "code": application.permit_data.commodity,
                "weightFactor": weight_factor,
            }),
        );

        for rule in evaluate_rules(&permit_type.rules, &facts) {
            result.apply(&rule.consequence);
        }

        Ok(result)
    }

    fn check_vehicles(
        &self,
        permit_type: &PermitType,
        application: &PermitApplication,
        result: &mut ValidationResult,
    ) {
        let permittable: HashSet<&str> = permit_type.all_vehicle_codes().collect();

        let mut previous = None;
        let mut sequence_traceable = true;

        for code in &application.permit_data.vehicle_configuration {
            let Some(vehicle) = self.definition.vehicle_type(code) else {
                result.add_violation(
                    "VEHICLE_TYPE_UNKNOWN",
                    format!("vehicle type '{}' is not defined in policy", code),
                );
                // an unknown vehicle breaks the chain; later sequencing
                // violations would only be noise
                sequence_traceable = false;
                continue;
            };

            if !permittable.contains(code.as_str()) {
                result.add_violation(
                    "VEHICLE_NOT_PERMITTABLE",
                    format!(
                        "vehicle type '{}' is not permittable under permit type '{}'",
                        code, permit_type.id
                    ),
                );
            }

            if sequence_traceable {
                let follows = self.definition.category_follows(vehicle.category);
                let in_order = match previous {
                    None => follows.is_empty(),
                    Some(last) => follows.contains(&last),
                };
                if !in_order {
                    result.add_violation(
                        "VEHICLE_SEQUENCE_INVALID",
                        format!(
                            "vehicle type '{}' ({}) cannot take this position in the combination",
                            code, vehicle.category
                        ),
                    );
                }
            }

            previous = Some(vehicle.category);
        }
    }

    fn check_commodity(
        &self,
        permit_type: &PermitType,
        application: &PermitApplication,
        result: &mut ValidationResult,
    ) -> f64 {
        let Some(code) = &application.permit_data.commodity else {
            return 1.0;
        };

        match self.definition.commodity(code) {
            None => {
                result.add_violation(
                    "COMMODITY_UNKNOWN",
                    format!("commodity '{}' is not defined in policy", code),
                );
                1.0
            }
            Some(commodity) => {
                if !permit_type.covers_commodity(code) {
                    result.add_violation(
                        "COMMODITY_NOT_PERMITTABLE",
                        format!(
                            "commodity '{}' is not permittable under permit type '{}'",
                            code, permit_type.id
                        ),
                    );
                }
                commodity.weight_factor.unwrap_or(1.0)
            }
        }
    }

    fn check_regions(&self, application: &PermitApplication, result: &mut ValidationResult) {
        for code in &application.permit_data.regions {
            if self.definition.region(code).is_none() {
                result.add_violation(
                    "REGION_UNKNOWN",
                    format!("region '{}' is not defined in policy", code),
                );
            }
        }
    }

    // ── Query surface ──────────────────────────────────────────────────────

    /// All permit types
    pub fn permit_types(&self) -> &[PermitType] {
        self.definition.permit_types()
    }

    /// Vehicle types; the flag includes non-standard (LCV-only) types
    pub fn vehicle_types(&self, include_non_standard: bool) -> Vec<&VehicleType> {
        self.definition
            .vehicle_types()
            .iter()
            .filter(|v| include_non_standard || !v.lcv_only)
            .collect()
    }

    /// Commodities, optionally filtered to a permit type
    pub fn commodities(&self, permit_type: Option<&str>) -> Vec<&Commodity> {
        match permit_type {
            None => self.definition.commodities().iter().collect(),
            Some(id) => self.definition.commodities_for_permit_type(id),
        }
    }

    /// All geographic regions
    pub fn regions(&self) -> &[Region] {
        self.definition.regions()
    }

    /// Permittable power-unit and trailer codes for a permit type
    pub fn permittable_vehicle_types(&self, permit_type: &str) -> PermittableVehicles {
        resolver::permittable_vehicle_types(&self.definition, permit_type)
    }

    /// Vehicle types permittable as the next addition to a configuration
    pub fn next_permittable_vehicles(
        &self,
        permit_type: &str,
        commodity: Option<&str>,
        current: &[String],
    ) -> Vec<&VehicleType> {
        resolver::next_permittable_vehicles(&self.definition, permit_type, commodity, current)
    }

    /// Display code for a vehicle configuration
    pub fn display_code(&self, vehicle_codes: &[String], axles: &[AxleUnit]) -> Result<String> {
        let resolved: Vec<Option<&VehicleType>> = vehicle_codes
            .iter()
            .map(|code| self.definition.vehicle_type(code))
            .collect();
        display::display_code(&resolved, axles, self.definition.display_defaults())
    }

    /// Size-dimension limits applicable to a query
    pub fn size_dimension_limits(
        &self,
        permit_type: &str,
        commodity: Option<&str>,
        vehicle_codes: &[String],
        qualifiers: &[String],
    ) -> Option<SizeLimits> {
        resolver::size_dimension_limits(
            &self.definition,
            permit_type,
            commodity,
            vehicle_codes,
            qualifiers,
        )
    }
}

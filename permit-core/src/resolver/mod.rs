//! Permittable vehicle and commodity resolver
//!
//! Structural "what is allowed" queries over the merged policy definition:
//! permittable vehicle sets for a permit type, the legal next vehicle given
//! a partial configuration, applicable commodities, and size-dimension
//! limit selection. Query operations return empty results for unknown
//! codes; only validation treats unknown codes as violations.

use serde::{Deserialize, Serialize};

use crate::definition::{Commodity, PolicyDefinition, SizeLimits, VehicleType};

/// Permittable vehicle type codes for a permit type, split by role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermittableVehicles {
    /// Power unit codes, in declared order
    pub power_units: Vec<String>,

    /// Trailer and accessory codes, in declared order
    pub trailers: Vec<String>,
}

/// Permittable power-unit and trailer codes declared for a permit type
///
/// Unknown permit types yield an empty result.
pub fn permittable_vehicle_types(
    definition: &PolicyDefinition,
    permit_type_id: &str,
) -> PermittableVehicles {
    let Some(permit_type) = definition.permit_type(permit_type_id) else {
        return PermittableVehicles::default();
    };

    let mut result = PermittableVehicles::default();
    for code in &permit_type.allowed_vehicles.power_units {
        if !result.power_units.contains(code) {
            result.power_units.push(code.clone());
        }
    }
    for code in &permit_type.allowed_vehicles.trailers {
        if !result.trailers.contains(code) {
            result.trailers.push(code.clone());
        }
    }
    result
}

/// Vehicle types legally permittable as the next addition to a partial
/// configuration
///
/// Sequencing comes from the definition's declared rules (with built-in
/// defaults): an empty `follows` set must lead the combination, otherwise
/// the candidate's category must be allowed to follow the category of the
/// last vehicle already chosen. Unknown permit-type, commodity, or current
/// vehicle codes yield an empty result.
pub fn next_permittable_vehicles<'a>(
    definition: &'a PolicyDefinition,
    permit_type_id: &str,
    commodity: Option<&str>,
    current: &[String],
) -> Vec<&'a VehicleType> {
    let Some(permit_type) = definition.permit_type(permit_type_id) else {
        return vec![];
    };

    if let Some(code) = commodity {
        if definition.commodity(code).is_none() || !permit_type.covers_commodity(code) {
            return vec![];
        }
    }

    let last_category = match current.last() {
        None => None,
        Some(code) => match definition.vehicle_type(code) {
            Some(vehicle) => Some(vehicle.category),
            None => return vec![],
        },
    };

    definition
        .vehicle_types_for_permit_type(permit_type_id)
        .into_iter()
        .filter(|candidate| {
            let follows = definition.category_follows(candidate.category);
            match last_category {
                None => follows.is_empty(),
                Some(last) => follows.contains(&last),
            }
        })
        .collect()
}

/// Commodities applicable to a permit type
///
/// An omitted commodity returns everything declared for the permit type; a
/// supplied commodity narrows the result to that commodity when it is in
/// scope, and to nothing otherwise.
pub fn applicable_commodities<'a>(
    definition: &'a PolicyDefinition,
    permit_type_id: &str,
    commodity: Option<&str>,
) -> Vec<&'a Commodity> {
    let all = definition.commodities_for_permit_type(permit_type_id);
    match commodity {
        None => all,
        Some(code) => all.into_iter().filter(|c| c.code == code).collect(),
    }
}

/// Select the size-dimension limits applicable to a query
///
/// An entry matches when its commodity restriction covers the queried
/// commodity, its vehicle restriction covers every queried vehicle code,
/// and all of its qualifier tags are present in the query. Among matches
/// the entry with the most qualifier tags wins; ties go to the first
/// declared entry.
pub fn size_dimension_limits(
    definition: &PolicyDefinition,
    permit_type_id: &str,
    commodity: Option<&str>,
    vehicle_codes: &[String],
    qualifiers: &[String],
) -> Option<SizeLimits> {
    let permit_type = definition.permit_type(permit_type_id)?;

    let mut best: Option<(usize, &SizeLimits)> = None;

    for limit in &permit_type.dimension_limits {
        if !limit.commodities.is_empty() {
            match commodity {
                Some(code) if limit.commodities.iter().any(|c| c == code) => {}
                _ => continue,
            }
        }

        if !limit.vehicle_types.is_empty() {
            if vehicle_codes.is_empty() {
                continue;
            }
            if !vehicle_codes
                .iter()
                .all(|code| limit.vehicle_types.contains(code))
            {
                continue;
            }
        }

        if !limit.qualifiers.iter().all(|q| qualifiers.contains(q)) {
            continue;
        }

        let score = limit.qualifiers.len();
        // strictly-greater keeps the first declared entry on ties
        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, &limit.limits));
        }
    }

    best.map(|(_, limits)| *limits)
}

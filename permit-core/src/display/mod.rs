//! Vehicle display code generator
//!
//! Encodes an ordered vehicle-type sequence plus axle configuration into the
//! compact alphanumeric code printed on permits. Two encodings exist and the
//! choice is global: one unrecognized vehicle type or one oversized axle
//! unit switches the entire output to the universal form, never a partial
//! mix. The generator therefore runs two passes - classify the whole input,
//! then render uniformly in the selected mode.
//!
//! Thresholds (standard axle range, universal ceiling, spacing tiers) are
//! regulatory constants carried in [`DisplayDefaults`] and overridable from
//! the policy document.

use serde::{Deserialize, Serialize};

use crate::axle::AxleUnit;
use crate::definition::VehicleType;
use crate::error::{PolicyEngineError, Result};

/// Regulatory display-code constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayDefaults {
    /// Largest axle count a unit may have in the standard encoding
    pub standard_max_unit_axles: u32,

    /// Universal encoding: axle counts at or above this render with a `+`
    pub universal_axle_ceiling: u32,

    /// Universal encoding: axle counts at or above this render as repeated
    /// `X` markers (one per axle beyond the ceiling) closed by `E`
    pub extreme_axle_threshold: u32,

    /// Inter-unit spacing at or below this renders the `S` tier, in metres
    pub small_spacing_max_m: f64,

    /// Inter-unit spacing at or above this renders the `L` tier, in metres
    pub large_spacing_min_m: f64,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self {
            standard_max_unit_axles: 4,
            universal_axle_ceiling: 9,
            extreme_axle_threshold: 10,
            small_spacing_max_m: 3.0,
            large_spacing_min_m: 6.0,
        }
    }
}

/// Marker before a universal-encoded unit of a recognized vehicle type
const MARKER_RECOGNIZED: &str = "=";

/// Marker before a universal-encoded unit that cannot be classified
const MARKER_UNCLASSIFIED: &str = "MU";

/// Generate the display code for a vehicle configuration
///
/// `vehicles` holds the policy definition entry for each vehicle-type code
/// in sequence order, `None` for codes the definition does not know. Axle
/// units are consumed left-to-right across the vehicle sequence.
///
/// The one illegal input is a vehicle/axle mismatch among fully recognized
/// vehicles: the declared axle-unit total must equal the supplied unit
/// count. With any unrecognized vehicle type in play no such total exists,
/// and the universal encoding pairs units with vehicle types positionally
/// instead.
pub fn display_code(
    vehicles: &[Option<&VehicleType>],
    units: &[AxleUnit],
    defaults: &DisplayDefaults,
) -> Result<String> {
    if vehicles.is_empty() && units.is_empty() {
        return Ok(String::new());
    }

    for (i, unit) in units.iter().enumerate() {
        if unit.axles == 0 {
            return Err(PolicyEngineError::InvalidAxleConfiguration {
                reason: format!("axle unit {} has zero axles", i + 1),
            });
        }
    }

    // Pass 1: classify the whole input
    let all_recognized = vehicles.iter().all(|v| v.is_some());

    if all_recognized {
        let declared: usize = vehicles
            .iter()
            .flatten()
            .map(|v| v.effective_axle_units())
            .sum();
        if declared != units.len() {
            return Err(PolicyEngineError::MismatchedConfiguration {
                reason: format!(
                    "vehicle types declare {} axle units but {} were supplied",
                    declared,
                    units.len()
                ),
            });
        }

        let counts_standard = units
            .iter()
            .all(|u| u.axles <= defaults.standard_max_unit_axles);
        if counts_standard {
            // Pass 2, standard mode
            return Ok(render_standard(vehicles, units));
        }
    }

    // Pass 2, universal mode
    Ok(render_universal(vehicles, units, defaults))
}

fn render_standard(vehicles: &[Option<&VehicleType>], units: &[AxleUnit]) -> String {
    let mut out = String::new();
    let mut cursor = 0;
    let mut position = 0;

    for vehicle in vehicles.iter().flatten() {
        if let Some(prefix) = &vehicle.display_prefix {
            out.push_str(prefix);
        }

        for slot in 0..vehicle.effective_axle_units() {
            let unit = &units[cursor];
            cursor += 1;
            position += 1;

            out.push_str(&unit.axles.to_string());
            // spread multi-axle groups carry one dash per gap
            if unit.axles > 1 && unit.spacing.unwrap_or(0.0) > 0.0 {
                out.push_str(&"-".repeat((unit.axles - 1) as usize));
            }
            out.push(vehicle.group.axle_letter(slot == 0));
            out.push_str(&position_code(position));
        }
    }

    out
}

fn render_universal(
    vehicles: &[Option<&VehicleType>],
    units: &[AxleUnit],
    defaults: &DisplayDefaults,
) -> String {
    let mut out = String::new();

    for (i, unit) in units.iter().enumerate() {
        if let Some(spacing) = unit.spacing {
            if spacing <= defaults.small_spacing_max_m {
                out.push('S');
            } else if spacing >= defaults.large_spacing_min_m {
                out.push('L');
            }
        }

        // positional pairing: unit i belongs to vehicle i, extras are unclassified
        let recognized = matches!(vehicles.get(i), Some(Some(_)));
        out.push_str(if recognized {
            MARKER_RECOGNIZED
        } else {
            MARKER_UNCLASSIFIED
        });

        out.push_str(&universal_count_code(unit.axles, defaults));
        out.push('U');
        out.push_str(&position_code(i + 1));
    }

    out
}

fn universal_count_code(axles: u32, defaults: &DisplayDefaults) -> String {
    if axles >= defaults.extreme_axle_threshold {
        let excess = (axles - defaults.universal_axle_ceiling) as usize;
        format!("{}E", "X".repeat(excess))
    } else if axles >= defaults.universal_axle_ceiling {
        format!("{}+", axles)
    } else {
        axles.to_string()
    }
}

fn position_code(position: usize) -> String {
    if position <= 9 {
        position.to_string()
    } else {
        format!(".{}", position)
    }
}

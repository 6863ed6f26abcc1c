//! Axle and bridge-formula weight calculator
//!
//! Computes per-axle-unit and axle-group weight checks for a vehicle's axle
//! configuration. The calculator is a computed fact source: rule conditions
//! reference its results (e.g., `axleCalculation.totalOverload`), it has no
//! side effects, and it never mutates the input configuration.
//!
//! All threshold constants are regulatory values carried in
//! [`WeightDefaults`], overridable from the policy document - they are
//! policy data, not engineering choices.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PolicyEngineError, Result};

/// One axle unit in a vehicle configuration
///
/// Supplied per validation/display request, not part of the stored
/// definition. `spacing` is the distance in metres to the previous unit;
/// `wheels` is the total wheel count of the unit when the applicant
/// supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleUnit {
    /// Number of axles in the unit (positive)
    pub axles: u32,

    /// Unit weight in kilograms
    pub weight: f64,

    /// Spacing in metres to the previous unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,

    /// Total wheels on the unit, when supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheels: Option<u32>,
}

impl AxleUnit {
    /// Create an axle unit with no recorded spacing or wheel count
    pub fn new(axles: u32, weight: f64) -> Self {
        Self {
            axles,
            weight,
            spacing: None,
            wheels: None,
        }
    }

    /// Set the spacing to the previous unit
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Set the wheel count
    pub fn with_wheels(mut self, wheels: u32) -> Self {
        self.wheels = Some(wheels);
        self
    }
}

/// Regulatory weight-check constants
///
/// Defaults are the policy-configuration values; a document's
/// `weightDefaults` block overrides them wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightDefaults {
    /// Maximum permittable weight per axle, in kilograms
    pub max_axle_weight_kg: f64,

    /// Maximum wheels per axle for the number-of-wheels check
    pub max_wheels_per_axle: u32,

    /// Bridge formula base allowance, in kilograms
    pub bridge_base_kg: f64,

    /// Bridge formula allowance per axle in the group, in kilograms
    pub bridge_per_axle_kg: f64,

    /// Bridge formula allowance per metre of group span, in kilograms
    pub bridge_per_metre_kg: f64,

    /// Assumed inter-unit spacing in metres when none is recorded
    pub default_spacing_m: f64,
}

impl Default for WeightDefaults {
    fn default() -> Self {
        Self {
            max_axle_weight_kg: 9_100.0,
            max_wheels_per_axle: 4,
            bridge_base_kg: 18_000.0,
            bridge_per_axle_kg: 5_000.0,
            bridge_per_metre_kg: 300.0,
            default_spacing_m: 1.2,
        }
    }
}

impl WeightDefaults {
    /// Allowable weight for an axle group under the bridge formula
    ///
    /// `axles` is the total axle count of the group, `span_m` the distance
    /// spanned between the group's first and last unit.
    pub fn bridge_allowance_kg(&self, axles: u32, span_m: f64) -> f64 {
        self.bridge_base_kg + self.bridge_per_axle_kg * axles as f64 + self.bridge_per_metre_kg * span_m
    }
}

/// Identifier of a weight check, stable across versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// Unit weight against its permittable maximum
    CheckPermittableWeight,
    /// Supplied wheel count against the per-axle wheel range
    NumberOfWheels,
    /// Axle-group weight against the bridge formula allowance
    BridgeFormula,
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckKind::CheckPermittableWeight => write!(f, "check-permittable-weight"),
            CheckKind::NumberOfWheels => write!(f, "number-of-wheels"),
            CheckKind::BridgeFormula => write!(f, "bridge-formula"),
        }
    }
}

/// One pass/fail weight check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleCheck {
    /// Which check produced this result
    pub id: CheckKind,

    /// First axle unit covered (1-based position)
    pub first_unit: usize,

    /// Last axle unit covered (1-based position; equals `first_unit` for
    /// single-unit checks)
    pub last_unit: usize,

    /// Measured value
    pub actual: f64,

    /// Allowed maximum
    pub threshold: f64,

    /// Whether the check passed
    pub passed: bool,
}

impl AxleCheck {
    /// Positive excess over the threshold; zero for passing checks
    pub fn overload(&self) -> f64 {
        if self.passed {
            0.0
        } else {
            (self.actual - self.threshold).max(0.0)
        }
    }
}

/// Results of an axle calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleCalcResults {
    /// Every check performed, units first, then group spans
    pub checks: Vec<AxleCheck>,

    /// Sum of positive excess across all failing checks; zero when all pass
    pub total_overload: f64,
}

impl AxleCalcResults {
    /// Whether every check passed
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// The failing checks, in check order
    pub fn failed_checks(&self) -> impl Iterator<Item = &AxleCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Render as a fact subtree for rule evaluation
    ///
    /// Shape: `{ passed, totalOverload, failedChecks: [ids], checks: [..] }`.
    pub fn to_facts(&self) -> Value {
        let failed: Vec<String> = self.failed_checks().map(|c| c.id.to_string()).collect();
        serde_json::json!({
            "passed": self.passed(),
            "totalOverload": self.total_overload,
            "failedChecks": failed,
            "checks": serde_json::to_value(&self.checks).unwrap_or(Value::Null),
        })
    }
}

/// Run every weight check for an axle configuration
///
/// `weight_factor` is the commodity adjustment applied to each threshold
/// (1.0 when the commodity declares none). An empty configuration yields an
/// empty, passing result. A unit with zero axles is an input error.
pub fn calculate(
    units: &[AxleUnit],
    defaults: &WeightDefaults,
    weight_factor: f64,
) -> Result<AxleCalcResults> {
    for (i, unit) in units.iter().enumerate() {
        if unit.axles == 0 {
            return Err(PolicyEngineError::InvalidAxleConfiguration {
                reason: format!("axle unit {} has zero axles", i + 1),
            });
        }
    }

    let mut checks = vec![];

    // Per-unit checks
    for (i, unit) in units.iter().enumerate() {
        let position = i + 1;

        let threshold = defaults.max_axle_weight_kg * unit.axles as f64 * weight_factor;
        checks.push(AxleCheck {
            id: CheckKind::CheckPermittableWeight,
            first_unit: position,
            last_unit: position,
            actual: unit.weight,
            threshold,
            passed: unit.weight <= threshold,
        });

        if let Some(wheels) = unit.wheels {
            let min = unit.axles * 2;
            let max = unit.axles * defaults.max_wheels_per_axle;
            checks.push(AxleCheck {
                id: CheckKind::NumberOfWheels,
                first_unit: position,
                last_unit: position,
                actual: wheels as f64,
                threshold: max as f64,
                passed: wheels >= min && wheels <= max,
            });
        }
    }

    // Bridge formula over every contiguous span of two or more units
    for first in 0..units.len() {
        let mut group_axles = units[first].axles;
        let mut group_weight = units[first].weight;
        let mut span_m = 0.0;

        for last in (first + 1)..units.len() {
            group_axles += units[last].axles;
            group_weight += units[last].weight;
            span_m += units[last].spacing.unwrap_or(defaults.default_spacing_m);

            let threshold = defaults.bridge_allowance_kg(group_axles, span_m) * weight_factor;
            checks.push(AxleCheck {
                id: CheckKind::BridgeFormula,
                first_unit: first + 1,
                last_unit: last + 1,
                actual: group_weight,
                threshold,
                passed: group_weight <= threshold,
            });
        }
    }

    let total_overload = checks.iter().map(AxleCheck::overload).sum();

    Ok(AxleCalcResults {
        checks,
        total_overload,
    })
}

//! Validation result types
//!
//! The structured outcome of validating one permit application: ordered
//! violations, warnings, cost lines, and attached permit conditions.
//! Produced fresh per call and never mutated after return. Violations and
//! warnings are normal results, not errors.

use serde::{Deserialize, Serialize};

use crate::rules::Consequence;

/// A violation or warning raised during validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Stable outcome code (e.g., "VEHICLE_NOT_PERMITTABLE")
    pub code: String,

    /// Human-readable message naming the offending code or field
    pub message: String,
}

/// A cost line on the issued permit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    /// What the charge is for
    pub description: String,

    /// Amount in the permitting authority's currency
    pub amount: f64,
}

/// A condition attached to the issued permit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitCondition {
    /// Stable condition code (e.g., "CVSE-1000")
    pub code: String,

    /// Condition text
    pub description: String,
}

/// Result of validating a permit application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Violations, in evaluation order; any violation means non-compliance
    pub violations: Vec<ValidationOutcome>,

    /// Warnings, in evaluation order
    pub warnings: Vec<ValidationOutcome>,

    /// Cost lines, in evaluation order
    pub costs: Vec<CostLine>,

    /// Conditions attached to the permit, in evaluation order
    pub conditions: Vec<PermitCondition>,
}

impl ValidationResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the application is compliant (no violations)
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Sum of all cost lines
    pub fn total_cost(&self) -> f64 {
        self.costs.iter().map(|c| c.amount).sum()
    }

    /// Record a violation
    pub fn add_violation(&mut self, code: &str, message: String) {
        self.violations.push(ValidationOutcome {
            code: code.to_string(),
            message,
        });
    }

    /// Record a warning
    pub fn add_warning(&mut self, code: &str, message: String) {
        self.warnings.push(ValidationOutcome {
            code: code.to_string(),
            message,
        });
    }

    /// Record a triggered rule consequence
    pub fn apply(&mut self, consequence: &Consequence) {
        match consequence {
            Consequence::Violation { code, message } => {
                self.add_violation(code, message.clone());
            }
            Consequence::Warning { code, message } => {
                self.add_warning(code, message.clone());
            }
            Consequence::Cost {
                description,
                amount,
            } => self.costs.push(CostLine {
                description: description.clone(),
                amount: *amount,
            }),
            Consequence::Condition { code, description } => self.conditions.push(PermitCondition {
                code: code.to_string(),
                description: description.clone(),
            }),
        }
    }
}

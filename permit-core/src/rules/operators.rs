//! Comparison operators for rule conditions
//!
//! The operator set is a closed enumeration: it is small, fixed, and
//! domain-specific, so a tagged variant with an evaluation function and an
//! operand-shape check beats an open plugin registry. A comparison whose
//! left operand fails its shape check evaluates false; it never aborts the
//! surrounding rule tree.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date format used by every date-valued fact and operand
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Comparison operator in a rule condition leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// Trimmed string length of `a` is at least `b`
    StringMinimumLength,
    /// Date `a` strictly precedes date `b`; fails closed on parse failure
    DateLessThan,
    /// Pattern `b` matches anywhere in string `a`
    RegexMatch,
    /// `a` is a sequence of length zero
    IsEmptyArray,
}

impl ComparisonOperator {
    /// Whether the left operand has the shape this operator expects
    pub fn left_shape_ok(&self, left: &Value) -> bool {
        match self {
            ComparisonOperator::Equal | ComparisonOperator::NotEqual => true,
            ComparisonOperator::LessThan
            | ComparisonOperator::LessThanOrEqual
            | ComparisonOperator::GreaterThan
            | ComparisonOperator::GreaterThanOrEqual => left.is_number(),
            ComparisonOperator::StringMinimumLength
            | ComparisonOperator::DateLessThan
            | ComparisonOperator::RegexMatch => left.is_string(),
            ComparisonOperator::IsEmptyArray => left.is_array(),
        }
    }

    /// Evaluate the comparison
    ///
    /// A missing left operand, a failed shape check, or an ill-typed right
    /// operand all evaluate false rather than erroring: one malformed fact
    /// must not block evaluation of unrelated rules.
    pub fn evaluate(&self, left: Option<&Value>, right: &Value) -> bool {
        let left = match left {
            Some(value) => value,
            None => return false,
        };
        if !self.left_shape_ok(left) {
            return false;
        }
        self.apply(left, right)
    }

    fn apply(&self, left: &Value, right: &Value) -> bool {
        match self {
            ComparisonOperator::Equal => values_equal(left, right),
            ComparisonOperator::NotEqual => !values_equal(left, right),

            ComparisonOperator::LessThan => numeric(left, right, |a, b| a < b),
            ComparisonOperator::LessThanOrEqual => numeric(left, right, |a, b| a <= b),
            ComparisonOperator::GreaterThan => numeric(left, right, |a, b| a > b),
            ComparisonOperator::GreaterThanOrEqual => numeric(left, right, |a, b| a >= b),

            ComparisonOperator::StringMinimumLength => {
                match (left.as_str(), right.as_u64()) {
                    (Some(s), Some(min)) => s.trim().chars().count() as u64 >= min,
                    _ => false,
                }
            }

            ComparisonOperator::DateLessThan => {
                match (parse_date(left), parse_date(right)) {
                    (Some(a), Some(b)) => a < b,
                    // fails closed when either operand is not a policy-format date
                    _ => false,
                }
            }

            ComparisonOperator::RegexMatch => {
                match (left.as_str(), right.as_str()) {
                    (Some(s), Some(pattern)) => match Regex::new(pattern) {
                        Ok(re) => re.is_match(s),
                        Err(_) => false,
                    },
                    _ => false,
                }
            }

            ComparisonOperator::IsEmptyArray => {
                let empty = left.as_array().map(|a| a.is_empty()).unwrap_or(false);
                // right operand selects which emptiness state triggers
                match right.as_bool() {
                    Some(expected) => empty == expected,
                    None => empty,
                }
            }
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn numeric(left: &Value, right: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
}

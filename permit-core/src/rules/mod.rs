//! Declarative rule evaluation engine
//!
//! Rule sets live in the policy document as condition/consequence trees and
//! are interpreted here against a per-application fact set. See
//! [`node`] for the tree types, [`operators`] for the comparison operator
//! set, and [`evaluator`] for the interpreter.

mod evaluator;
mod facts;
mod node;
mod operators;

pub use evaluator::{evaluate_condition, evaluate_rules};
pub use facts::FactSet;
pub use node::{ConditionNode, Consequence, Operand, Rule};
pub use operators::{ComparisonOperator, DATE_FORMAT};

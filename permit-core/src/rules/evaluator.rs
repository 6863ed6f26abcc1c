//! Rule tree interpreter
//!
//! Walks declarative condition trees against a fact set and returns the
//! rules whose conditions hold, in declared order. Evaluation is
//! synchronous, side-effect-free, and deterministic: the same fact set
//! evaluated twice yields identical results.

use serde_json::Value;

use super::facts::FactSet;
use super::node::{ConditionNode, Operand, Rule};

/// Evaluate a rule list, returning the triggered rules in declared order
pub fn evaluate_rules<'a>(rules: &'a [Rule], facts: &FactSet) -> Vec<&'a Rule> {
    rules
        .iter()
        .filter(|rule| evaluate_condition(&rule.condition, facts))
        .collect()
}

/// Evaluate a single condition tree
pub fn evaluate_condition(node: &ConditionNode, facts: &FactSet) -> bool {
    match node {
        // all/any short-circuit at the first deciding child
        ConditionNode::AllOf { conditions } => conditions
            .iter()
            .all(|child| evaluate_condition(child, facts)),

        ConditionNode::AnyOf { conditions } => conditions
            .iter()
            .any(|child| evaluate_condition(child, facts)),

        ConditionNode::Not { condition } => !evaluate_condition(condition, facts),

        ConditionNode::Compare { fact, op, value } => {
            let left = facts.get(fact);
            match resolve_operand(value, facts) {
                Some(right) => op.evaluate(left, right),
                // dangling fact reference on the right: comparison is false
                None => false,
            }
        }
    }
}

fn resolve_operand<'a>(operand: &'a Operand, facts: &'a FactSet) -> Option<&'a Value> {
    match operand {
        Operand::Literal(value) => Some(value),
        Operand::Fact { fact } => facts.get(fact),
    }
}

//! Declarative rule tree types
//!
//! Rules are data, not code: a tagged condition tree walked by the
//! interpreter in [`evaluator`](super::evaluator), paired with the
//! consequence to emit when the tree evaluates true. Keeping the trees as
//! tagged variants makes rule sets serializable, diffable, and safe to load
//! from an untrusted policy document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operators::ComparisonOperator;

/// A validation rule: condition tree plus consequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique identifier within the permit type (e.g., "company-name-required")
    pub id: String,

    /// Description of what the rule enforces
    #[serde(default)]
    pub description: String,

    /// Condition tree; the consequence fires when it evaluates true
    pub condition: ConditionNode,

    /// What to emit when the condition holds
    pub consequence: Consequence,
}

impl Rule {
    /// Create a new rule
    pub fn new(id: &str, condition: ConditionNode, consequence: Consequence) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            condition,
            consequence,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// A node in a condition tree
///
/// Groups short-circuit: `allOf` stops at the first failing child, `anyOf`
/// at the first passing child.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConditionNode {
    /// True when every child is true (true when empty)
    AllOf { conditions: Vec<ConditionNode> },

    /// True when at least one child is true (false when empty)
    AnyOf { conditions: Vec<ConditionNode> },

    /// Negation of the inner condition
    Not { condition: Box<ConditionNode> },

    /// Leaf comparison of a fact against a literal or another fact
    Compare {
        /// Dot-path into the fact set (e.g., "permitData.companyName")
        fact: String,
        /// Comparison operator
        op: ComparisonOperator,
        /// Right-hand operand
        value: Operand,
    },
}

impl ConditionNode {
    /// Leaf comparison against a literal value
    pub fn compare(fact: &str, op: ComparisonOperator, value: Value) -> Self {
        ConditionNode::Compare {
            fact: fact.to_string(),
            op,
            value: Operand::Literal(value),
        }
    }

    /// Leaf comparison against another fact path
    pub fn compare_facts(fact: &str, op: ComparisonOperator, other: &str) -> Self {
        ConditionNode::Compare {
            fact: fact.to_string(),
            op,
            value: Operand::Fact {
                fact: other.to_string(),
            },
        }
    }

    /// All-of group
    pub fn all_of(conditions: Vec<ConditionNode>) -> Self {
        ConditionNode::AllOf { conditions }
    }

    /// Any-of group
    pub fn any_of(conditions: Vec<ConditionNode>) -> Self {
        ConditionNode::AnyOf { conditions }
    }

    /// Negation
    pub fn not(condition: ConditionNode) -> Self {
        ConditionNode::Not {
            condition: Box::new(condition),
        }
    }
}

/// Right-hand operand of a comparison: a literal, or a fact reference
///
/// `{"fact": "permitData.startDate"}` resolves against the fact set at
/// evaluation time; any other JSON value is taken literally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// Reference to another fact path
    Fact { fact: String },
    /// Literal JSON value
    Literal(Value),
}

/// Consequence emitted when a rule's condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Consequence {
    /// The application is non-compliant
    Violation { code: String, message: String },

    /// The application is compliant but the applicant should be told
    Warning { code: String, message: String },

    /// A cost line on the issued permit
    Cost { description: String, amount: f64 },

    /// A condition attached to the issued permit
    Condition { code: String, description: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_deserializes_from_document_json() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "company-name-required",
            "condition": {
                "type": "compare",
                "fact": "permitData.companyName",
                "op": "string-minimum-length",
                "value": 1
            },
            "consequence": {
                "type": "violation",
                "code": "COMPANY_NAME_REQUIRED",
                "message": "Company name is required"
            }
        }))
        .unwrap();

        assert_eq!(rule.id, "company-name-required");
        assert!(matches!(rule.condition, ConditionNode::Compare { .. }));
        assert!(matches!(rule.consequence, Consequence::Violation { .. }));
    }

    #[test]
    fn test_nested_groups_deserialize() {
        let node: ConditionNode = serde_json::from_value(json!({
            "type": "allOf",
            "conditions": [
                {
                    "type": "not",
                    "condition": {
                        "type": "compare",
                        "fact": "permitData.vehicleConfiguration",
                        "op": "is-empty-array",
                        "value": true
                    }
                },
                {
                    "type": "anyOf",
                    "conditions": []
                }
            ]
        }))
        .unwrap();

        match node {
            ConditionNode::AllOf { conditions } => assert_eq!(conditions.len(), 2),
            other => panic!("expected allOf, got {:?}", other),
        }
    }

    #[test]
    fn test_operand_fact_reference_vs_literal() {
        let fact_ref: Operand = serde_json::from_value(json!({ "fact": "permitData.expiryDate" })).unwrap();
        assert!(matches!(fact_ref, Operand::Fact { .. }));

        let literal: Operand = serde_json::from_value(json!({ "width": 2.6 })).unwrap();
        assert!(matches!(literal, Operand::Literal(_)));

        let literal: Operand = serde_json::from_value(json!(42)).unwrap();
        assert!(matches!(literal, Operand::Literal(_)));
    }
}

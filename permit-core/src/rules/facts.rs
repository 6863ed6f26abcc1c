//! Fact set: the structured view rules evaluate against
//!
//! A fact set is a JSON tree built from the permit application merged with
//! policy-model lookups (commodity weight factors, axle calculation
//! results). Facts are addressed by dot-paths; numeric segments index into
//! arrays ("permitData.axleConfiguration.0.weight").

use serde_json::Value;

/// Immutable-after-build fact tree addressed by dot-paths
#[derive(Debug, Clone)]
pub struct FactSet {
    root: Value,
}

impl FactSet {
    /// Build a fact set from a JSON value
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Look up a fact by dot-path; `None` when any segment is absent
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Graft a computed value at a top-level key (e.g., "axleCalculation")
    ///
    /// Used during fact-set assembly only; the set is read-only once rule
    /// evaluation starts.
    pub fn set_top_level(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.root {
            map.insert(key.to_string(), value);
        }
    }

    /// The underlying JSON tree
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

use serde::{Deserialize, Serialize};

/// A branch condition as written in a definition document.
///
/// Conditions are externally tagged, e.g.
/// `{ "not": { "number_equals": { "variable": "$.count", "value": 3 } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDef {
  /// True when every nested condition is true.
  And(Vec<ConditionDef>),
  /// True when at least one nested condition is true.
  Or(Vec<ConditionDef>),
  /// Negates the nested condition.
  Not(Box<ConditionDef>),
  /// Compares the value at `variable` with a string.
  StringEquals { variable: String, value: String },
  /// Compares the value at `variable` with a number.
  NumberEquals { variable: String, value: f64 },
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::StateDef;

/// A complete state machine definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMachineDef {
  /// Optional human readable name, only used for diagnostics.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Identifier of the first state to execute.
  pub start_at: String,
  /// Upper bound on the number of transitions a single run may take.
  pub max_execution: usize,
  pub states: HashMap<String, StateDef>,
}

impl StateMachineDef {
  /// Parse a definition from a JSON document.
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }

  /// Render the definition as pretty-printed JSON.
  pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

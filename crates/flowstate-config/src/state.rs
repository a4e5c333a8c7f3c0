use serde::{Deserialize, Serialize};

use crate::condition::ConditionDef;

/// A single rule of a choice state: when `condition` holds, go to `next`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRuleDef {
  pub condition: ConditionDef,
  pub next: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateDef {
  /// Does nothing and moves on to `next`.
  Pass { next: String },
  /// Sleeps for `delay_ms` milliseconds, then moves on to `next`.
  Wait { delay_ms: u64, next: String },
  /// Takes the first rule whose condition holds, otherwise `default`.
  Choice {
    choices: Vec<ChoiceRuleDef>,
    default: String,
  },
}

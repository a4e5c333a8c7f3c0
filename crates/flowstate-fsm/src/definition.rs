//! Loading state machines from definition documents.

use std::time::Duration;

use flowstate_config::{ChoiceRuleDef, ConditionDef, StateDef, StateMachineDef};

use crate::choice::Choice;
use crate::error::FsmError;
use crate::machine::StateMachine;
use crate::operator::Operator;
use crate::state::{ChoiceBranch, State};

impl From<ConditionDef> for Choice {
  fn from(def: ConditionDef) -> Self {
    match def {
      ConditionDef::And(children) => Choice::and(children.into_iter().map(Choice::from)),
      ConditionDef::Or(children) => Choice::or(children.into_iter().map(Choice::from)),
      ConditionDef::Not(child) => Choice::not(Choice::from(*child)),
      ConditionDef::StringEquals { variable, value } => {
        Choice::base(variable, Operator::StringEquals(value))
      }
      ConditionDef::NumberEquals { variable, value } => {
        Choice::base(variable, Operator::NumberEquals(value))
      }
    }
  }
}

impl From<ChoiceRuleDef> for ChoiceBranch {
  fn from(def: ChoiceRuleDef) -> Self {
    ChoiceBranch::new(def.condition.into(), def.next)
  }
}

impl From<StateDef> for State {
  fn from(def: StateDef) -> Self {
    match def {
      StateDef::Pass { next } => State::pass(next),
      StateDef::Wait { delay_ms, next } => State::wait(Duration::from_millis(delay_ms), next),
      StateDef::Choice { choices, default } => {
        State::choice(choices.into_iter().map(ChoiceBranch::from).collect(), default)
      }
    }
  }
}

impl TryFrom<StateMachineDef> for StateMachine {
  type Error = FsmError;

  fn try_from(def: StateMachineDef) -> Result<Self, Self::Error> {
    let states = def
      .states
      .into_iter()
      .map(|(id, state)| (id, State::from(state)))
      .collect();
    StateMachine::new(states, def.start_at, def.max_execution)
  }
}

impl StateMachine {
  /// Build a state machine from a definition document.
  ///
  /// The conversion is structural: transition targets are not checked.
  pub fn from_def(def: StateMachineDef) -> Result<Self, FsmError> {
    Self::try_from(def)
  }

  /// Parse and build a state machine from JSON.
  pub fn from_json(content: &str) -> Result<Self, FsmError> {
    let def = StateMachineDef::from_json(content).map_err(|e| FsmError::InvalidDefinition {
      message: e.to_string(),
    })?;
    Self::from_def(def)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::END_STATE;

  #[test]
  fn test_condition_conversion() {
    let def = ConditionDef::Or(vec![
      ConditionDef::StringEquals {
        variable: "$.kind".to_string(),
        value: "a".to_string(),
      },
      ConditionDef::Not(Box::new(ConditionDef::NumberEquals {
        variable: "$.n".to_string(),
        value: 1.0,
      })),
    ]);

    assert_eq!(
      Choice::from(def),
      Choice::or([
        Choice::base("$.kind", Operator::StringEquals("a".to_string())),
        Choice::not(Choice::base("$.n", Operator::NumberEquals(1.0))),
      ])
    );
  }

  #[test]
  fn test_from_json() {
    let sm = StateMachine::from_json(
      r#"{
        "start_at": "wait",
        "max_execution": 3,
        "states": {
          "wait": { "type": "wait", "delay_ms": 1500, "next": "done" },
          "done": { "type": "pass", "next": "EndState" }
        }
      }"#,
    )
    .unwrap();

    assert_eq!(sm.start_at(), "wait");
    assert_eq!(sm.max_execution(), 3);
    assert_eq!(
      sm.get_state("wait"),
      Some(&State::wait(Duration::from_millis(1500), "done"))
    );
    assert_eq!(sm.get_state("done"), Some(&State::pass(END_STATE)));
  }

  #[test]
  fn test_from_json_rejects_zero_bound() {
    let result = StateMachine::from_json(r#"{ "start_at": "a", "max_execution": 0, "states": {} }"#);
    assert!(matches!(result, Err(FsmError::InvalidDefinition { .. })));
  }

  #[test]
  fn test_from_json_rejects_bad_document() {
    let result = StateMachine::from_json(r#"{ "start_at": "a" "#);
    assert!(matches!(result, Err(FsmError::InvalidDefinition { .. })));
  }
}

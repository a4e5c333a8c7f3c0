//! Boolean condition trees evaluated against an execution.

use crate::error::FsmError;
use crate::execution::Execution;
use crate::operator::Operator;
use crate::path;

/// A leaf condition: extract the value at `variable` and apply `operator`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseChoice {
  /// Path expression into the execution data.
  pub variable: String,
  pub operator: Operator,
}

impl BaseChoice {
  pub fn new(variable: impl Into<String>, operator: Operator) -> Self {
    Self {
      variable: variable.into(),
      operator,
    }
  }

  pub fn evaluate(&self, execution: &Execution) -> Result<bool, FsmError> {
    let raw = path::extract(&self.variable, execution.data())?;
    self.operator.evaluate(&raw)
  }
}

/// A condition tree.
///
/// Children are evaluated in declared order, fresh on every call.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
  Base(BaseChoice),
  /// True iff every child is true. Stops at the first false child or error.
  And(Vec<Choice>),
  /// True iff at least one child is true. Every child is evaluated unless one
  /// errors, which stops evaluation immediately.
  Or(Vec<Choice>),
  Not(Box<Choice>),
}

impl Choice {
  pub fn base(variable: impl Into<String>, operator: Operator) -> Self {
    Choice::Base(BaseChoice::new(variable, operator))
  }

  pub fn and(children: impl IntoIterator<Item = Choice>) -> Self {
    Choice::And(children.into_iter().collect())
  }

  pub fn or(children: impl IntoIterator<Item = Choice>) -> Self {
    Choice::Or(children.into_iter().collect())
  }

  pub fn not(child: Choice) -> Self {
    Choice::Not(Box::new(child))
  }

  pub fn evaluate(&self, execution: &Execution) -> Result<bool, FsmError> {
    match self {
      Choice::Base(base) => base.evaluate(execution),
      Choice::And(children) => {
        for child in children {
          if !child.evaluate(execution)? {
            return Ok(false);
          }
        }
        Ok(true)
      }
      Choice::Or(children) => {
        let mut matched = false;
        for child in children {
          if child.evaluate(execution)? {
            matched = true;
          }
        }
        Ok(matched)
      }
      Choice::Not(child) => Ok(!child.evaluate(execution)?),
    }
  }
}

impl From<BaseChoice> for Choice {
  fn from(base: BaseChoice) -> Self {
    Choice::Base(base)
  }
}

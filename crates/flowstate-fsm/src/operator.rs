//! Scalar comparison primitives used by base choices.

use std::fmt;

use crate::error::FsmError;

/// A predicate over the string form of a single extracted value.
///
/// The operand is fixed when the operator is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
  StringEquals(String),
  NumberEquals(f64),
}

impl Operator {
  /// Apply the operator to `raw`.
  ///
  /// `NumberEquals` fails with [`FsmError::Conversion`] when `raw` is not a
  /// floating point number; a failed parse is never reported as `false`.
  pub fn evaluate(&self, raw: &str) -> Result<bool, FsmError> {
    match self {
      Operator::StringEquals(expected) => Ok(raw == expected),
      Operator::NumberEquals(expected) => {
        let actual: f64 = raw.parse().map_err(|e| FsmError::Conversion {
          value: raw.to_string(),
          source: e,
        })?;
        Ok(actual == *expected)
      }
    }
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operator::StringEquals(expected) => write!(f, "string_equals({:?})", expected),
      Operator::NumberEquals(expected) => write!(f, "number_equals({})", expected),
    }
  }
}

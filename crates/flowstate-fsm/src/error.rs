//! Engine errors.

use std::num::ParseFloatError;

/// Errors that can occur while evaluating conditions or driving a state machine.
///
/// Every error aborts the enclosing operation and is propagated unchanged up
/// to [`StateMachine::execute`](crate::StateMachine::execute).
#[derive(Debug, thiserror::Error)]
pub enum FsmError {
  /// The path expression does not parse.
  #[error("malformed path expression '{path}': {message}")]
  MalformedPath { path: String, message: String },

  /// The path expression matched nothing in the execution data.
  #[error("path '{path}' matched no value")]
  NoMatch { path: String },

  /// The execution data is not valid JSON.
  #[error("execution data is not valid JSON")]
  InvalidData(#[source] serde_json::Error),

  /// A matched value could not be converted to the operand type.
  #[error("cannot convert '{value}' to a number")]
  Conversion {
    value: String,
    #[source]
    source: ParseFloatError,
  },

  /// A transition points at a state that is not part of the machine.
  #[error("state '{state_id}' not found in state machine")]
  UnknownState { state_id: String },

  /// The state machine definition cannot be used.
  #[error("invalid state machine definition: {message}")]
  InvalidDefinition { message: String },

  /// The operation is a declared extension point with no implementation.
  #[error("{operation} is not implemented")]
  Unimplemented { operation: &'static str },
}

//! The run-time record of a single state machine run.

use serde::de::IgnoredAny;

use crate::error::FsmError;

/// One run of a state machine.
///
/// Holds a unique identifier and the JSON document every condition is
/// evaluated against. The document is checked at construction and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
  id: String,
  data: Vec<u8>,
}

impl Execution {
  /// Create an execution with a caller supplied identifier.
  ///
  /// Fails with [`FsmError::InvalidData`] when `data` is not valid JSON.
  pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<Self, FsmError> {
    let data = data.into();
    serde_json::from_slice::<IgnoredAny>(&data).map_err(FsmError::InvalidData)?;

    Ok(Self {
      id: id.into(),
      data,
    })
  }

  /// Create an execution with a freshly generated identifier.
  pub fn from_input(data: impl Into<Vec<u8>>) -> Result<Self, FsmError> {
    Self::new(uuid::Uuid::new_v4().to_string(), data)
  }

  /// Create an execution from an already parsed payload.
  pub fn from_value(value: &serde_json::Value) -> Self {
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      data: value.to_string().into_bytes(),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// The raw JSON document.
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// Parse the JSON document.
  pub fn value(&self) -> Result<serde_json::Value, FsmError> {
    serde_json::from_slice(&self.data).map_err(FsmError::InvalidData)
  }

  /// Bind a state's result into the execution data at `path`.
  ///
  /// Not implemented: no state writes back into the execution data yet.
  pub fn apply_path(&mut self, _path: &str) -> Result<(), FsmError> {
    Err(FsmError::Unimplemented {
      operation: "apply_path",
    })
  }
}

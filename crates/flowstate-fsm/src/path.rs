//! Path expressions over JSON execution data.
//!
//! Paths are JSONPath queries as defined by RFC 9535 (`$.items[0].qty`,
//! `$..sku`, `$.items[-1:]`, `$.items[?@.qty > 1]`), parsed and evaluated by
//! [`serde_json_path`].

use serde_json::Value;

use crate::error::FsmError;

/// A parsed path expression.
#[derive(Debug)]
pub struct JsonPath {
  source: String,
  query: serde_json_path::JsonPath,
}

impl JsonPath {
  /// Parse a path expression.
  pub fn parse(path: &str) -> Result<Self, FsmError> {
    let query = serde_json_path::JsonPath::parse(path).map_err(|e| FsmError::MalformedPath {
      path: path.to_string(),
      message: e.to_string(),
    })?;

    Ok(Self {
      source: path.to_string(),
      query,
    })
  }

  /// The expression this path was parsed from.
  pub fn as_str(&self) -> &str {
    &self.source
  }

  /// Evaluate the path against `root`, yielding matches in document order.
  pub fn query<'a>(&self, root: &'a Value) -> std::vec::IntoIter<&'a Value> {
    self.query.query(root).all().into_iter()
  }

  /// The first match of the path in `root`, if any.
  pub fn first<'a>(&self, root: &'a Value) -> Option<&'a Value> {
    self.query.query(root).first()
  }
}

/// String form of a matched value, as handed to an operator.
///
/// Strings yield their contents without quotes, everything else its
/// compact JSON text. This departs from handing over the raw matched text:
/// `"5"` and `5` both render as `5`.
pub fn scalar_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Resolve `path` against the JSON document in `data` and return the first
/// match rendered with [`scalar_text`].
///
/// Further matches are ignored.
pub fn extract(path: &str, data: &[u8]) -> Result<String, FsmError> {
  let parsed = JsonPath::parse(path)?;
  let document: Value = serde_json::from_slice(data).map_err(FsmError::InvalidData)?;

  parsed
    .first(&document)
    .map(scalar_text)
    .ok_or_else(|| FsmError::NoMatch {
      path: path.to_string(),
    })
}

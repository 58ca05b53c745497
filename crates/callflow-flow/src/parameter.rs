//! Module parameters.
//!
//! Parameter values are loosely typed in exported flows: the same field may
//! hold a string, a number, a boolean or a nested object depending on the
//! module type. [`ParameterValue`] keeps the decoded shape and the accessors
//! on [`Parameter`] convert it, failing with [`FlowError::ParameterType`]
//! instead of guessing.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
  Text(String),
  Number(serde_json::Number),
  Bool(bool),
  Structured(serde_json::Value),
}

impl ParameterValue {
  pub fn kind(&self) -> &'static str {
    match self {
      ParameterValue::Text(_) => "text",
      ParameterValue::Number(_) => "number",
      ParameterValue::Bool(_) => "boolean",
      ParameterValue::Structured(serde_json::Value::Null) => "null",
      ParameterValue::Structured(_) => "structured",
    }
  }

  /// The value as JSON, for building external payloads.
  pub fn to_json(&self) -> serde_json::Value {
    match self {
      ParameterValue::Text(s) => serde_json::Value::String(s.clone()),
      ParameterValue::Number(n) => serde_json::Value::Number(n.clone()),
      ParameterValue::Bool(b) => serde_json::Value::Bool(*b),
      ParameterValue::Structured(v) => v.clone(),
    }
  }
}

impl Default for ParameterValue {
  fn default() -> Self {
    ParameterValue::Structured(serde_json::Value::Null)
  }
}

impl From<&str> for ParameterValue {
  fn from(s: &str) -> Self {
    ParameterValue::Text(s.to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
  pub name: String,
  #[serde(default)]
  pub value: ParameterValue,
  /// Distinguishes repeated entries that share a name (e.g. `Attribute`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  /// Human label of a bound resource, e.g. a queue's display name.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resource_name: Option<String>,
  /// When set, `value` is a key to look up in this namespace.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,
}

impl Parameter {
  pub fn new(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
      key: None,
      resource_name: None,
      namespace: None,
    }
  }

  pub fn text(&self) -> Result<&str, FlowError> {
    match &self.value {
      ParameterValue::Text(s) => Ok(s),
      other => Err(self.type_error("text", other)),
    }
  }

  /// Numeric value; numeric strings such as `"8"` are accepted.
  pub fn number(&self) -> Result<f64, FlowError> {
    match &self.value {
      ParameterValue::Number(n) => n.as_f64().ok_or_else(|| self.type_error("number", &self.value)),
      ParameterValue::Text(s) => s
        .trim()
        .parse::<f64>()
        .map_err(|_| self.type_error("number", &self.value)),
      other => Err(self.type_error("number", other)),
    }
  }

  /// Boolean value; `"true"`/`"false"` strings are accepted.
  pub fn flag(&self) -> Result<bool, FlowError> {
    match &self.value {
      ParameterValue::Bool(b) => Ok(*b),
      ParameterValue::Text(s) => match s.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(self.type_error("boolean", &self.value)),
      },
      other => Err(self.type_error("boolean", other)),
    }
  }

  fn type_error(&self, expected: &'static str, actual: &ParameterValue) -> FlowError {
    FlowError::ParameterType {
      name: self.name.clone(),
      expected,
      actual: actual.kind(),
    }
  }
}

/// The ordered parameter list of a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
  /// First parameter with the given name.
  pub fn get(&self, name: &str) -> Option<&Parameter> {
    self.0.iter().find(|p| p.name == name)
  }

  /// Every parameter with the given name, in document order.
  pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Parameter> + 'a {
    self.0.iter().filter(move |p| p.name == name)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

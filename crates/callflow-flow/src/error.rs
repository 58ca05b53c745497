use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
  #[error("failed to parse flow document: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("start module not found: {0}")]
  StartNotFound(String),

  #[error("duplicate module id: {0}")]
  DuplicateModule(String),

  #[error("branch references unknown module: from={from}, to={to}")]
  InvalidTransition { from: String, to: String },

  #[error("parameter {name} expected {expected}, got {actual}")]
  ParameterType {
    name: String,
    expected: &'static str,
    actual: &'static str,
  },
}

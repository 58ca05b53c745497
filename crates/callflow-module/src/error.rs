//! Module execution errors.
//!
//! Every variant is a configuration error: the module cannot do what the flow
//! asks of it. Unresolvable prompt references and unknown module types are
//! not errors.

use callflow_flow::{BranchCondition, FlowError, ModuleId, ModuleType};

use crate::connector::InvokeError;
use crate::resolve::UnknownNamespace;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
  /// The record reached a runner for a different module type.
  #[error("module of type {actual} being run as {expected}")]
  WrongType {
    actual: ModuleType,
    expected: String,
  },

  #[error("missing parameter {0}")]
  MissingParameter(String),

  #[error("module {module_id} has no {condition} branch")]
  MissingBranch {
    module_id: ModuleId,
    condition: BranchCondition,
  },

  #[error("invalid parameter: {0}")]
  InvalidParameter(#[from] FlowError),

  #[error("parameter {name} is not a valid duration in seconds: {value}")]
  InvalidDuration { name: String, value: f64 },

  #[error(transparent)]
  Namespace(#[from] UnknownNamespace),

  #[error("unknown transfer target '{0}'")]
  UnknownTransferTarget(String),

  #[error("no flow named '{0}'")]
  FlowNotFound(String),

  /// Transport-level invocation failure. Failures reported by the resource
  /// itself take the module's `Error` branch instead.
  #[error("failed to invoke external resource '{name}'")]
  Invocation {
    name: String,
    #[source]
    source: InvokeError,
  },
}

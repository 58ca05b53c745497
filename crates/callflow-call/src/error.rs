//! Simulation errors.

use callflow_flow::{FlowError, ModuleId};
use callflow_module::ModuleError;

/// Errors that can occur while loading flows or running a call.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
  /// A flow failed structural validation.
  #[error("invalid flow '{flow}'")]
  InvalidFlow {
    flow: String,
    #[source]
    source: FlowError,
  },

  /// A flow without a name was loaded without giving one.
  #[error("flow starting at '{start}' has no name")]
  UnnamedFlow { start: ModuleId },

  /// Module ids are shared by all loaded flows.
  #[error("module '{module_id}' in flow '{flow}' is already loaded")]
  DuplicateModule { module_id: ModuleId, flow: String },

  #[error("flow '{0}' is already loaded")]
  DuplicateFlow(String),

  #[error("flow '{0}' is not loaded")]
  FlowNotFound(String),

  /// A branch led to a module that no loaded flow contains.
  #[error("module '{module_id}' not found in any loaded flow")]
  ModuleNotFound { module_id: ModuleId },

  #[error("call exceeded {max_steps} steps")]
  StepLimit { max_steps: usize },

  /// A module failed to run.
  #[error("module '{module_id}' failed")]
  Module {
    module_id: ModuleId,
    #[source]
    source: ModuleError,
  },
}

use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, system};
use serde_json::Value;
use tracing::debug;

use super::{require_link, require_parameter, require_type};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Selects the queue a later transfer will use.
#[derive(Debug, Clone)]
pub struct SetQueue(Module);

impl From<Module> for SetQueue {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for SetQueue {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    require_type(&self.0, ModuleType::SetQueue)?;
    let queue = require_parameter(&self.0, "Queue")?;
    let arn = queue.text()?;

    call.set_system(system::QUEUE_ARN, Value::String(arn.to_string()));
    call.set_system(
      system::QUEUE_NAME,
      queue
        .resource_name
        .clone()
        .map(Value::String)
        .unwrap_or(Value::Null),
    );
    debug!(module_id = %self.0.id, queue_arn = %arn, "queue set");

    require_link(&self.0, BranchCondition::Success).map(Some)
  }
}

use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, system};
use tracing::{debug, warn};

use super::{require_link, require_parameter, require_type};
use crate::connector::{CallConnector, Event};
use crate::error::ModuleError;
use crate::resolve::render;
use crate::runner::Runner;

/// Transfers the call to another flow or to the selected queue.
///
/// A flow transfer continues at the other flow's start module. A queue
/// transfer hands the call to an agent, which ends the simulation.
#[derive(Debug, Clone)]
pub struct Transfer(Module);

impl From<Module> for Transfer {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Transfer {
  fn to_flow(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let flow = require_parameter(&self.0, "ContactFlowId")?;
    let flow_name = match &flow.resource_name {
      Some(name) => name.as_str(),
      None => flow.text()?,
    };

    let start = call
      .flow_start(flow_name)
      .ok_or_else(|| ModuleError::FlowNotFound(flow_name.to_string()))?;

    debug!(module_id = %self.0.id, flow = %flow_name, next = %start, "transferring to flow");
    call.emit(Event::FlowTransfer {
      flow_name: flow_name.to_string(),
    });
    Ok(Some(start))
  }

  fn to_queue(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let queue_arn = call.get_system(system::QUEUE_ARN).and_then(|v| render(&v));
    let queue_name = call.get_system(system::QUEUE_NAME).and_then(|v| render(&v));

    if queue_arn.is_none() {
      warn!(module_id = %self.0.id, "queue transfer without a queue set");
      return require_link(&self.0, BranchCondition::Error).map(Some);
    }

    debug!(module_id = %self.0.id, queue = ?queue_name, "transferring to queue");
    call.emit(Event::QueueTransfer {
      queue_arn,
      queue_name,
    });
    Ok(None)
  }
}

impl Runner for Transfer {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    require_type(&self.0, ModuleType::Transfer)?;

    match self.0.target.as_deref() {
      Some("Flow") => self.to_flow(call),
      Some("Queue") => self.to_queue(call),
      other => Err(ModuleError::UnknownTransferTarget(
        other.unwrap_or_default().to_string(),
      )),
    }
  }
}

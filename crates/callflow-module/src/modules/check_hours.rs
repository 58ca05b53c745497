use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, system};
use tracing::{debug, warn};

use super::{require_link, require_type};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::resolve::render;
use crate::runner::Runner;

/// Routes on whether the hours of operation are currently open.
///
/// The hours are named by the `Hours` parameter, or by the current queue
/// when the parameter is absent.
#[derive(Debug, Clone)]
pub struct CheckHoursOfOperation(Module);

impl From<Module> for CheckHoursOfOperation {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl CheckHoursOfOperation {
  fn hours_name(&self, call: &dyn CallConnector) -> Result<String, ModuleError> {
    if let Some(parameter) = self.0.parameters.get("Hours") {
      if let Some(name) = &parameter.resource_name {
        return Ok(name.clone());
      }
      return Ok(parameter.text()?.to_string());
    }

    call
      .get_system(system::QUEUE_NAME)
      .and_then(|v| render(&v))
      .ok_or_else(|| ModuleError::MissingParameter("Hours".to_string()))
  }
}

impl Runner for CheckHoursOfOperation {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::CheckHoursOfOperation)?;
    let hours = self.hours_name(&*call)?;

    let condition = match call.in_hours(&hours) {
      Some(true) => BranchCondition::True,
      Some(false) => BranchCondition::False,
      None => {
        warn!(module_id = %module.id, hours = %hours, "unknown hours of operation");
        BranchCondition::Error
      }
    };
    debug!(module_id = %module.id, hours = %hours, open = %condition, "hours checked");

    require_link(module, condition).map(Some)
  }
}

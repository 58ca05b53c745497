//! The runner contract and the dispatcher.

use callflow_flow::{Module, ModuleId, ModuleType};

use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::modules::{
  CheckAttribute, CheckHoursOfOperation, Disconnect, GetUserInput, InvokeExternalResource,
  Passthrough, PlayPrompt, SetAttributes, SetQueue, StoreUserInput, Transfer,
};

/// The executable behavior of a module.
///
/// `run` returns the id of the next module, `None` when the call is over, or
/// an error when the module is misconfigured.
pub trait Runner {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError>;
}

/// A module bound to the runner for its type.
#[derive(Debug, Clone)]
pub enum ModuleRunner {
  Disconnect(Disconnect),
  Transfer(Transfer),
  PlayPrompt(PlayPrompt),
  SetQueue(SetQueue),
  StoreUserInput(StoreUserInput),
  GetUserInput(GetUserInput),
  CheckAttribute(CheckAttribute),
  SetAttributes(SetAttributes),
  InvokeExternalResource(InvokeExternalResource),
  CheckHoursOfOperation(CheckHoursOfOperation),
  Passthrough(Passthrough),
}

/// Wrap a module in the runner for its type.
///
/// Never fails: types without a runner become [`Passthrough`] so a
/// simulated call can always move past them.
pub fn make_runner(module: Module) -> ModuleRunner {
  match module.module_type {
    ModuleType::Disconnect => ModuleRunner::Disconnect(Disconnect::from(module)),
    ModuleType::Transfer => ModuleRunner::Transfer(Transfer::from(module)),
    ModuleType::PlayPrompt => ModuleRunner::PlayPrompt(PlayPrompt::from(module)),
    ModuleType::SetQueue => ModuleRunner::SetQueue(SetQueue::from(module)),
    ModuleType::StoreUserInput => ModuleRunner::StoreUserInput(StoreUserInput::from(module)),
    ModuleType::GetUserInput => ModuleRunner::GetUserInput(GetUserInput::from(module)),
    ModuleType::CheckAttribute => ModuleRunner::CheckAttribute(CheckAttribute::from(module)),
    ModuleType::SetAttributes => ModuleRunner::SetAttributes(SetAttributes::from(module)),
    ModuleType::InvokeExternalResource => {
      ModuleRunner::InvokeExternalResource(InvokeExternalResource::from(module))
    }
    ModuleType::CheckHoursOfOperation => {
      ModuleRunner::CheckHoursOfOperation(CheckHoursOfOperation::from(module))
    }
    ModuleType::Other(_) => ModuleRunner::Passthrough(Passthrough::from(module)),
  }
}

impl ModuleRunner {
  /// Name of the runner, as used in logs.
  pub fn name(&self) -> &'static str {
    match self {
      ModuleRunner::Disconnect(_) => "Disconnect",
      ModuleRunner::Transfer(_) => "Transfer",
      ModuleRunner::PlayPrompt(_) => "PlayPrompt",
      ModuleRunner::SetQueue(_) => "SetQueue",
      ModuleRunner::StoreUserInput(_) => "StoreUserInput",
      ModuleRunner::GetUserInput(_) => "GetUserInput",
      ModuleRunner::CheckAttribute(_) => "CheckAttribute",
      ModuleRunner::SetAttributes(_) => "SetAttributes",
      ModuleRunner::InvokeExternalResource(_) => "InvokeExternalResource",
      ModuleRunner::CheckHoursOfOperation(_) => "CheckHoursOfOperation",
      ModuleRunner::Passthrough(_) => "Passthrough",
    }
  }

  fn inner(&self) -> &dyn Runner {
    match self {
      ModuleRunner::Disconnect(r) => r,
      ModuleRunner::Transfer(r) => r,
      ModuleRunner::PlayPrompt(r) => r,
      ModuleRunner::SetQueue(r) => r,
      ModuleRunner::StoreUserInput(r) => r,
      ModuleRunner::GetUserInput(r) => r,
      ModuleRunner::CheckAttribute(r) => r,
      ModuleRunner::SetAttributes(r) => r,
      ModuleRunner::InvokeExternalResource(r) => r,
      ModuleRunner::CheckHoursOfOperation(r) => r,
      ModuleRunner::Passthrough(r) => r,
    }
  }
}

impl Runner for ModuleRunner {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    self.inner().run(call)
  }
}

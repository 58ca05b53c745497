//! One runner per module type.
//!
//! Each runner wraps the decoded module record and re-checks its type tag
//! before doing anything else, so a runner can be exercised on its own.

mod check_attribute;
mod check_hours;
mod disconnect;
mod get_user_input;
mod invoke_external;
mod passthrough;
mod play_prompt;
mod set_attributes;
mod set_queue;
mod store_user_input;
mod transfer;

pub use check_attribute::CheckAttribute;
pub use check_hours::CheckHoursOfOperation;
pub use disconnect::Disconnect;
pub use get_user_input::GetUserInput;
pub use invoke_external::InvokeExternalResource;
pub use passthrough::Passthrough;
pub use play_prompt::PlayPrompt;
pub use set_attributes::SetAttributes;
pub use set_queue::SetQueue;
pub use store_user_input::StoreUserInput;
pub use transfer::Transfer;

use std::time::Duration;

use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, Parameter};
use tracing::debug;

use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::resolve::{CallLookup, Lookup, Namespace, resolve_text};

fn require_type(module: &Module, expected: ModuleType) -> Result<(), ModuleError> {
  if module.module_type != expected {
    return Err(ModuleError::WrongType {
      actual: module.module_type.clone(),
      expected: expected.to_string(),
    });
  }
  Ok(())
}

fn require_parameter<'a>(module: &'a Module, name: &str) -> Result<&'a Parameter, ModuleError> {
  module
    .parameters
    .get(name)
    .ok_or_else(|| ModuleError::MissingParameter(name.to_string()))
}

/// The next module for an outcome the flow must handle.
fn require_link(module: &Module, condition: BranchCondition) -> Result<ModuleId, ModuleError> {
  match module.branches.link(&condition) {
    Some(next) => {
      debug!(module_id = %module.id, branch = %condition, next = %next, "branch taken");
      Ok(next)
    }
    None => Err(ModuleError::MissingBranch {
      module_id: module.id.clone(),
      condition,
    }),
  }
}

/// Resolve and play the module's `Text` prompt.
fn play_text(module: &Module, call: &mut dyn CallConnector) -> Result<(), ModuleError> {
  let text = require_parameter(module, "Text")?.text()?;
  let speech_type = require_parameter(module, "TextToSpeechType")?.text()?;

  let ssml = speech_type == "ssml";
  let resolved = resolve_text(text, &CallLookup(&*call));
  call.send(&resolved, ssml);
  Ok(())
}

/// A `Timeout` style parameter given in seconds.
fn seconds(parameter: &Parameter) -> Result<Duration, ModuleError> {
  let secs = parameter.number()?;
  Duration::try_from_secs_f64(secs.max(0.0)).map_err(|_| ModuleError::InvalidDuration {
    name: parameter.name.clone(),
    value: secs,
  })
}

/// The value of a keyed parameter entry.
///
/// Without a namespace the value is literal. With one, the value is a key
/// looked up in that namespace, and `None` is returned when it is absent.
fn parameter_value(
  parameter: &Parameter,
  call: &dyn CallConnector,
) -> Result<Option<serde_json::Value>, ModuleError> {
  let Some(namespace) = parameter.namespace.as_deref() else {
    return Ok(Some(parameter.value.to_json()));
  };

  let namespace: Namespace = namespace.parse()?;
  let key = parameter.text()?;
  Ok(
    CallLookup(call)
      .lookup(namespace, key)
      .filter(|v| !v.is_null()),
  )
}

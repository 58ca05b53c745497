use callflow_flow::{BranchCondition, Module, ModuleId};
use tracing::debug;

use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Stands in for module types without a runner.
///
/// Moves on through `Success` when the module has one and ends the call
/// otherwise.
#[derive(Debug, Clone)]
pub struct Passthrough(Module);

impl From<Module> for Passthrough {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for Passthrough {
  fn run(&self, _call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    if module.module_type.is_known() {
      return Err(ModuleError::WrongType {
        actual: module.module_type.clone(),
        expected: "Passthrough".to_string(),
      });
    }

    debug!(
      module_id = %module.id,
      module_type = %module.module_type,
      "no runner for module type, passing through"
    );
    Ok(module.branches.link(&BranchCondition::Success))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modules::test_call::{TestCall, module};

  #[test]
  fn test_follows_success() {
    let m = module(
      r#"{
        "id":"a",
        "type":"SetVoice",
        "branches":[{"condition":"Success","transition":"b"}],
        "parameters":[{"name":"VoiceId","value":"Joanna"}]
      }"#,
    );

    let mut call = TestCall::default();
    let next = Passthrough::from(m).run(&mut call).unwrap();
    assert_eq!(next, Some(ModuleId::from("b")));
    assert!(call.sent.is_empty());
    assert!(call.events.is_empty());
  }

  #[test]
  fn test_terminates_without_success() {
    let m = module(r#"{"id":"a","type":"SetLoggingBehavior"}"#);

    let next = Passthrough::from(m).run(&mut TestCall::default()).unwrap();
    assert_eq!(next, None);
  }

  #[test]
  fn test_rejects_known_type() {
    let m = module(r#"{"id":"a","type":"PlayPrompt"}"#);

    let err = Passthrough::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type PlayPrompt being run as Passthrough"
    );
  }
}

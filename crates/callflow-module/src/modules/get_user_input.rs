use callflow_flow::{BranchCondition, ConditionType, Module, ModuleId, ModuleType};
use tracing::debug;

use super::{play_text, require_link, require_parameter, require_type, seconds};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Prompts for a single keypress and routes on the pressed digit.
///
/// Each `Evaluate` branch with an `Equals` condition is a menu option. No
/// keypress takes `Timeout`, any other keypress takes `NoMatch`.
#[derive(Debug, Clone)]
pub struct GetUserInput(Module);

impl From<Module> for GetUserInput {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for GetUserInput {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::GetUserInput)?;
    let timeout = seconds(require_parameter(module, "Timeout")?)?;

    play_text(module, call)?;

    let Some(input) = call.receive(1, timeout, false) else {
      return require_link(module, BranchCondition::Timeout).map(Some);
    };

    let option = module.branches.evaluations().find(|b| {
      b.condition_type == Some(ConditionType::Equals)
        && b.condition_value.as_deref() == Some(input.as_str())
    });

    match option {
      Some(branch) => {
        debug!(module_id = %module.id, input = %input, "menu option selected");
        branch
          .transition
          .clone()
          .map(Some)
          .ok_or_else(|| ModuleError::MissingBranch {
            module_id: module.id.clone(),
            condition: BranchCondition::Evaluate,
          })
      }
      None => require_link(module, BranchCondition::NoMatch).map(Some),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::modules::test_call::{TestCall, module};

  fn menu() -> Module {
    module(
      r#"{
        "id":"menu",
        "type":"GetUserInput",
        "branches":[
          {"condition":"Evaluate","conditionType":"Equals","conditionValue":"1","transition":"sales"},
          {"condition":"Evaluate","conditionType":"Equals","conditionValue":"2","transition":"support"},
          {"condition":"Timeout","transition":"timeout"},
          {"condition":"NoMatch","transition":"nomatch"},
          {"condition":"Error","transition":"error"}
        ],
        "parameters":[
          {"name":"Text","value":"Press 1 for sales or 2 for support, $.Attributes.name"},
          {"name":"TextToSpeechType","value":"text"},
          {"name":"Timeout","value":"8"},
          {"name":"MaxDigits","value":1}
        ]
      }"#,
    )
  }

  fn run_with(input: Option<&str>) -> (Option<ModuleId>, TestCall) {
    let mut call = TestCall::with_contact_data(&[("name", "Edward")]);
    call.inputs.push_back(input.map(str::to_string));
    let next = GetUserInput::from(menu()).run(&mut call).unwrap();
    (next, call)
  }

  #[test]
  fn test_wrong_module() {
    let m = module(r#"{"id":"a","type":"StoreUserInput"}"#);

    let err = GetUserInput::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type StoreUserInput being run as GetUserInput"
    );
  }

  #[test]
  fn test_missing_timeout() {
    let m = module(r#"{"id":"a","type":"GetUserInput","parameters":[{"name":"Text","value":"hi"}]}"#);

    let err = GetUserInput::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(err.to_string(), "missing parameter Timeout");
  }

  #[test]
  fn test_unrepresentable_timeout() {
    let m = module(
      r#"{"id":"a","type":"GetUserInput","parameters":[
        {"name":"Text","value":"hi"},
        {"name":"TextToSpeechType","value":"text"},
        {"name":"Timeout","value":"inf"}
      ]}"#,
    );

    let mut call = TestCall::default();
    let err = GetUserInput::from(m).run(&mut call).unwrap_err();

    assert!(matches!(err, ModuleError::InvalidDuration { ref name, .. } if name == "Timeout"));
    assert_eq!(
      err.to_string(),
      "parameter Timeout is not a valid duration in seconds: inf"
    );
    assert!(call.received.is_empty());
  }

  #[test]
  fn test_matched_option() {
    let (next, call) = run_with(Some("2"));

    assert_eq!(next, Some(ModuleId::from("support")));
    assert_eq!(
      call.sent[0].0,
      "Press 1 for sales or 2 for support, Edward"
    );
    assert_eq!(call.received, vec![(1, Duration::from_secs(8), false)]);
  }

  #[test]
  fn test_no_match() {
    let (next, _) = run_with(Some("9"));
    assert_eq!(next, Some(ModuleId::from("nomatch")));
  }

  #[test]
  fn test_timeout() {
    let (next, _) = run_with(None);
    assert_eq!(next, Some(ModuleId::from("timeout")));
  }
}

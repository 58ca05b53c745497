use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, system};
use serde_json::Value;
use tracing::{debug, warn};

use super::{play_text, require_link, require_parameter, require_type, seconds};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Prompts for a multi-digit entry and stores it in the system
/// `Stored customer input` variable.
#[derive(Debug, Clone)]
pub struct StoreUserInput(Module);

impl From<Module> for StoreUserInput {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for StoreUserInput {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::StoreUserInput)?;

    let max_digits = require_parameter(module, "MaxDigits")?.number()?;
    let timeout = seconds(require_parameter(module, "Timeout")?)?;
    let encrypt = match module.parameters.get("EncryptEntry") {
      Some(p) => p.flag()?,
      None => false,
    };

    play_text(module, call)?;

    match call.receive(max_digits.max(1.0) as usize, timeout, encrypt) {
      Some(input) => {
        debug!(module_id = %module.id, digits = input.len(), "stored customer input");
        call.set_system(system::STORED_CUSTOMER_INPUT, Value::String(input));
        require_link(module, BranchCondition::Success).map(Some)
      }
      None => {
        warn!(module_id = %module.id, "no customer input received");
        require_link(module, BranchCondition::Error).map(Some)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::modules::test_call::{TestCall, module};
  use serde_json::json;

  fn store_input(extra: &str) -> Module {
    module(&format!(
      r#"{{
        "id":"a",
        "type":"StoreUserInput",
        "branches":[
          {{"condition":"Success","transition":"ok"}},
          {{"condition":"Error","transition":"err"}}
        ],
        "parameters":[
          {{"name":"Text","value":"Please enter your account number"}},
          {{"name":"TextToSpeechType","value":"text"}},
          {{"name":"CustomerInputType","value":"Custom"}},
          {{"name":"MaxDigits","value":"8"}},
          {{"name":"Timeout","value":"5"}}{extra}
        ]
      }}"#
    ))
  }

  #[test]
  fn test_wrong_module() {
    let m = module(r#"{"id":"a","type":"GetUserInput"}"#);

    let err = StoreUserInput::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type GetUserInput being run as StoreUserInput"
    );
  }

  #[test]
  fn test_missing_max_digits() {
    let m = module(r#"{"id":"a","type":"StoreUserInput","parameters":[{"name":"Timeout","value":"5"}]}"#);

    let err = StoreUserInput::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(err.to_string(), "missing parameter MaxDigits");
  }

  #[test]
  fn test_oversized_timeout() {
    let m = module(
      r#"{"id":"a","type":"StoreUserInput","parameters":[
        {"name":"MaxDigits","value":"4"},
        {"name":"Timeout","value":"1e20"}
      ]}"#,
    );

    let err = StoreUserInput::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert!(matches!(err, ModuleError::InvalidDuration { .. }));
  }

  #[test]
  fn test_stores_input() {
    let mut call = TestCall::default();
    call.inputs.push_back(Some("12345678".into()));

    let next = StoreUserInput::from(store_input("")).run(&mut call).unwrap();

    assert_eq!(next, Some(ModuleId::from("ok")));
    assert_eq!(
      call.system[system::STORED_CUSTOMER_INPUT],
      json!("12345678")
    );
    assert_eq!(call.received, vec![(8, Duration::from_secs(5), false)]);
    assert_eq!(call.sent[0].0, "Please enter your account number");
  }

  #[test]
  fn test_encrypted_entry() {
    let mut call = TestCall::default();
    call.inputs.push_back(Some("1234".into()));

    StoreUserInput::from(store_input(r#",{"name":"EncryptEntry","value":true}"#))
      .run(&mut call)
      .unwrap();

    assert!(call.received[0].2);
  }

  #[test]
  fn test_no_input_takes_error() {
    let mut call = TestCall::default();

    let next = StoreUserInput::from(store_input("")).run(&mut call).unwrap();

    assert_eq!(next, Some(ModuleId::from("err")));
    assert!(!call.system.contains_key(system::STORED_CUSTOMER_INPUT));
  }
}

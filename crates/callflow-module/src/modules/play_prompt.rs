use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType};

use super::{play_text, require_link, require_type};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Plays a prompt to the caller after resolving its variable references.
#[derive(Debug, Clone)]
pub struct PlayPrompt(Module);

impl From<Module> for PlayPrompt {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for PlayPrompt {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    require_type(&self.0, ModuleType::PlayPrompt)?;
    play_text(&self.0, call)?;
    require_link(&self.0, BranchCondition::Success).map(Some)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modules::test_call::{TestCall, module};

  const NEXT: &str = "00000000-0000-4000-0000-000000000001";

  fn state() -> TestCall {
    TestCall::with_contact_data(&[("name", "Edward"), ("estimatedWaitTime", "3")])
  }

  fn prompt(text: &str, speech_type: &str) -> Module {
    module(&format!(
      r#"{{
        "id":"55c7b51c-ab55-4c63-ac42-235b4a0f904f",
        "type":"PlayPrompt",
        "branches":[{{"condition":"Success","transition":"{NEXT}"}}],
        "parameters":[
          {{"name":"Text","value":{},"namespace":null}},
          {{"name":"TextToSpeechType","value":"{speech_type}"}}
        ]
      }}"#,
      serde_json::Value::String(text.to_string())
    ))
  }

  #[test]
  fn test_wrong_module() {
    let m = module(r#"{"id":"43dcc4f2-3392-4a38-90ed-0216f8594ea8","type":"Transfer"}"#);

    let mut call = state();
    let err = PlayPrompt::from(m).run(&mut call).unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type Transfer being run as PlayPrompt"
    );
    assert!(call.sent.is_empty());
  }

  #[test]
  fn test_missing_parameter() {
    let m = module(r#"{"id":"43dcc4f2-3392-4a38-90ed-0216f8594ea8","type":"PlayPrompt"}"#);

    let err = PlayPrompt::from(m).run(&mut state()).unwrap_err();
    assert_eq!(err.to_string(), "missing parameter Text");
  }

  #[test]
  fn test_missing_speech_type() {
    let m = module(
      r#"{"id":"a","type":"PlayPrompt","parameters":[{"name":"Text","value":"hi"}]}"#,
    );

    let err = PlayPrompt::from(m).run(&mut state()).unwrap_err();
    assert!(matches!(err, ModuleError::MissingParameter(name) if name == "TextToSpeechType"));
  }

  #[test]
  fn test_bad_path_left_verbatim() {
    let mut call = state();
    let next = PlayPrompt::from(prompt("Thanks for your call, $.Computer.name.", "text"))
      .run(&mut call)
      .unwrap();

    assert_eq!(next, Some(ModuleId::from(NEXT)));
    assert_eq!(
      call.last_sent(),
      Some(&("Thanks for your call, $.Computer.name.".to_string(), false))
    );
  }

  #[test]
  fn test_success() {
    let mut call = state();
    let next = PlayPrompt::from(prompt("Thanks for your call, $.Attributes.name.", "text"))
      .run(&mut call)
      .unwrap();

    assert_eq!(next, Some(ModuleId::from(NEXT)));
    assert_eq!(
      call.last_sent(),
      Some(&("Thanks for your call, Edward.".to_string(), false))
    );
  }

  #[test]
  fn test_success_ssml() {
    let mut call = state();
    let next = PlayPrompt::from(prompt("<speak>Thanks for your call.</speak>", "ssml"))
      .run(&mut call)
      .unwrap();

    assert_eq!(next, Some(ModuleId::from(NEXT)));
    assert_eq!(
      call.last_sent(),
      Some(&("<speak>Thanks for your call.</speak>".to_string(), true))
    );
  }

  #[test]
  fn test_success_user_defined() {
    let mut call = state();
    PlayPrompt::from(prompt(
      "The estimated wait time is $.User Defined.estimatedWaitTime minutes. Please hold.",
      "text",
    ))
    .run(&mut call)
    .unwrap();

    assert_eq!(
      call.last_sent().map(|(text, _)| text.as_str()),
      Some("The estimated wait time is 3 minutes. Please hold.")
    );
  }

  #[test]
  fn test_missing_success_branch() {
    let m = module(
      r#"{
        "id":"a",
        "type":"PlayPrompt",
        "parameters":[{"name":"Text","value":"hi"},{"name":"TextToSpeechType","value":"text"}]
      }"#,
    );

    let err = PlayPrompt::from(m).run(&mut state()).unwrap_err();
    assert_eq!(err.to_string(), "module a has no Success branch");
  }
}

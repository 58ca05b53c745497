//! In-memory call session.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::time::Duration;

use callflow_flow::{ModuleId, system};
use callflow_module::{CallConnector, Event, InvocationOutcome, InvokeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{ExternalStub, SimulatorConfig};
use crate::events::CallNotifier;

/// One scripted caller response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerInput {
  /// Keys pressed on the dial pad.
  Digits(String),
  /// The caller does not respond.
  Silence,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid caller input '{0}': expected digits, '*', '#' or '-' for silence")]
pub struct InvalidCallerInput(pub String);

impl FromStr for CallerInput {
  type Err = InvalidCallerInput;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "-" {
      return Ok(CallerInput::Silence);
    }
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '*' || c == '#') {
      return Err(InvalidCallerInput(s.to_string()));
    }
    Ok(CallerInput::Digits(s.to_string()))
  }
}

/// How a simulated call starts.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
  /// Caller responses, consumed one per input request.
  pub inputs: Vec<CallerInput>,
  /// Contact attributes set before the flow starts.
  pub attributes: HashMap<String, Value>,
  pub customer_number: Option<String>,
  pub dialed_number: Option<String>,
}

/// A prompt played to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
  pub text: String,
  pub ssml: bool,
}

/// The state of one simulated call.
pub struct Call<'a> {
  id: String,
  config: &'a SimulatorConfig,
  flow_starts: &'a HashMap<String, ModuleId>,
  notifier: &'a dyn CallNotifier,
  inputs: VecDeque<CallerInput>,
  attributes: HashMap<String, Value>,
  system: HashMap<String, Value>,
  external: HashMap<String, Value>,
  prompts: Vec<Prompt>,
  events: Vec<Event>,
}

impl<'a> Call<'a> {
  pub fn new(
    id: String,
    options: CallOptions,
    config: &'a SimulatorConfig,
    flow_starts: &'a HashMap<String, ModuleId>,
    notifier: &'a dyn CallNotifier,
  ) -> Self {
    let mut system = HashMap::new();
    system.insert(system::CONTACT_ID.to_string(), Value::String(id.clone()));
    if let Some(number) = options.customer_number {
      system.insert(system::CUSTOMER_NUMBER.to_string(), Value::String(number));
    }
    if let Some(number) = options.dialed_number {
      system.insert(system::DIALED_NUMBER.to_string(), Value::String(number));
    }

    Self {
      id,
      config,
      flow_starts,
      notifier,
      inputs: options.inputs.into(),
      attributes: options.attributes,
      system,
      external: HashMap::new(),
      prompts: Vec::new(),
      events: Vec::new(),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn prompts(&self) -> &[Prompt] {
    &self.prompts
  }

  pub fn events(&self) -> &[Event] {
    &self.events
  }

  /// Consume the call, returning its final state.
  pub(crate) fn into_parts(self) -> CallParts {
    CallParts {
      prompts: self.prompts,
      events: self.events,
      attributes: self.attributes,
      system: self.system,
      external: self.external,
    }
  }
}

pub(crate) struct CallParts {
  pub prompts: Vec<Prompt>,
  pub events: Vec<Event>,
  pub attributes: HashMap<String, Value>,
  pub system: HashMap<String, Value>,
  pub external: HashMap<String, Value>,
}

impl CallConnector for Call<'_> {
  fn send(&mut self, text: &str, ssml: bool) {
    debug!(call_id = %self.id, text, ssml, "prompt");
    self.prompts.push(Prompt {
      text: text.to_string(),
      ssml,
    });
    self.emit(Event::Prompt {
      text: text.to_string(),
      ssml,
    });
  }

  fn receive(&mut self, max_digits: usize, timeout: Duration, encrypt: bool) -> Option<String> {
    let input = match self.inputs.pop_front() {
      Some(CallerInput::Digits(digits)) => Some(digits.chars().take(max_digits).collect::<String>()),
      Some(CallerInput::Silence) | None => None,
    }
    .filter(|digits| !digits.is_empty());

    debug!(
      call_id = %self.id,
      max_digits,
      timeout_secs = timeout.as_secs_f64(),
      received = input.is_some(),
      "caller input"
    );

    // Encrypted entries never appear in the event log.
    let logged = match (&input, encrypt) {
      (Some(digits), true) => Some("*".repeat(digits.len())),
      (input, false) => input.clone(),
      (None, true) => None,
    };
    self.emit(Event::InputReceived {
      input: logged,
      encrypted: encrypt,
    });

    input
  }

  fn emit(&mut self, event: Event) {
    self.notifier.notify(&self.id, &event);
    self.events.push(event);
  }

  fn get_external(&self, key: &str) -> Option<Value> {
    self.external.get(key).cloned()
  }

  fn set_external(&mut self, key: &str, value: Value) {
    self.external.insert(key.to_string(), value);
  }

  fn clear_external(&mut self) {
    self.external.clear();
  }

  fn get_contact_data(&self, key: &str) -> Option<Value> {
    self.attributes.get(key).cloned()
  }

  fn set_contact_data(&mut self, key: &str, value: Value) {
    self.attributes.insert(key.to_string(), value);
  }

  fn contact_data(&self) -> serde_json::Map<String, Value> {
    self
      .attributes
      .iter()
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect()
  }

  fn get_system(&self, key: &str) -> Option<Value> {
    self.system.get(key).cloned()
  }

  fn set_system(&mut self, key: &str, value: Value) {
    self.system.insert(key.to_string(), value);
  }

  fn invoke_external(&mut self, name: &str, _payload: Value) -> Result<InvocationOutcome, InvokeError> {
    match self.config.external_stub(name) {
      Some(ExternalStub::Output { output }) => Ok(InvocationOutcome::Success(output.to_string())),
      Some(ExternalStub::Error { error }) => Ok(InvocationOutcome::Failed(error.clone())),
      None => Err(InvokeError::NotFound(name.to_string())),
    }
  }

  fn flow_start(&self, flow_name: &str) -> Option<ModuleId> {
    self.flow_starts.get(flow_name).cloned()
  }

  fn in_hours(&self, hours_name: &str) -> Option<bool> {
    let hours = self.config.hours.get(hours_name)?;
    Some(hours.is_open(self.config.now()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::events::NoopNotifier;
  use serde_json::json;

  fn call<'a>(
    options: CallOptions,
    config: &'a SimulatorConfig,
    flows: &'a HashMap<String, ModuleId>,
  ) -> Call<'a> {
    Call::new("call-1".into(), options, config, flows, &NoopNotifier)
  }

  #[test]
  fn test_caller_input_parse() {
    assert_eq!(
      "12#".parse::<CallerInput>(),
      Ok(CallerInput::Digits("12#".into()))
    );
    assert_eq!("-".parse::<CallerInput>(), Ok(CallerInput::Silence));
    assert_eq!(
      "12a".parse::<CallerInput>(),
      Err(InvalidCallerInput("12a".into()))
    );
    assert!("".parse::<CallerInput>().is_err());
  }

  #[test]
  fn test_initial_system_values() {
    let config = SimulatorConfig::default();
    let flows = HashMap::new();
    let options = CallOptions {
      customer_number: Some("+15550100".into()),
      ..Default::default()
    };

    let call = call(options, &config, &flows);

    assert_eq!(call.get_system(system::CONTACT_ID), Some(json!("call-1")));
    assert_eq!(
      call.get_system(system::CUSTOMER_NUMBER),
      Some(json!("+15550100"))
    );
    assert_eq!(call.get_system(system::DIALED_NUMBER), None);
  }

  #[test]
  fn test_receive_script() {
    let config = SimulatorConfig::default();
    let flows = HashMap::new();
    let options = CallOptions {
      inputs: vec![
        CallerInput::Digits("123456".into()),
        CallerInput::Silence,
        CallerInput::Digits("9".into()),
      ],
      ..Default::default()
    };
    let mut call = call(options, &config, &flows);
    let timeout = Duration::from_secs(5);

    assert_eq!(call.receive(4, timeout, false), Some("1234".into()));
    assert_eq!(call.receive(1, timeout, false), None);
    assert_eq!(call.receive(1, timeout, true), Some("9".into()));
    assert_eq!(call.receive(1, timeout, false), None);

    assert_eq!(
      call.events()[2],
      Event::InputReceived {
        input: Some("*".into()),
        encrypted: true
      }
    );
  }

  #[test]
  fn test_send_records_prompt() {
    let config = SimulatorConfig::default();
    let flows = HashMap::new();
    let mut call = call(CallOptions::default(), &config, &flows);

    call.send("<speak>Hi</speak>", true);

    assert_eq!(
      call.prompts(),
      &[Prompt {
        text: "<speak>Hi</speak>".into(),
        ssml: true
      }]
    );
    assert_eq!(call.events().len(), 1);
  }

  #[test]
  fn test_invoke_stubs() {
    let config = SimulatorConfig::from_json(
      r#"{"external": {"lookup": {"output": {"a": 1}}, "broken": {"error": "boom"}}}"#,
    )
    .unwrap();
    let flows = HashMap::new();
    let mut call = call(CallOptions::default(), &config, &flows);

    assert_eq!(
      call.invoke_external("arn:x:function:lookup", json!({})).unwrap(),
      InvocationOutcome::Success(r#"{"a":1}"#.into())
    );
    assert_eq!(
      call.invoke_external("broken", json!({})).unwrap(),
      InvocationOutcome::Failed("boom".into())
    );
    assert!(matches!(
      call.invoke_external("other", json!({})),
      Err(InvokeError::NotFound(name)) if name == "other"
    ));
  }

  #[test]
  fn test_hours() {
    let config = SimulatorConfig::from_json(
      r#"{
        "hours": {"Sales": {"schedule": [{"day": "Mon", "open": "09:00", "close": "17:00"}]}},
        "now": "2024-01-15T18:00:00"
      }"#,
    )
    .unwrap();
    let flows = HashMap::new();
    let call = call(CallOptions::default(), &config, &flows);

    assert_eq!(call.in_hours("Sales"), Some(false));
    assert_eq!(call.in_hours("Support"), None);
  }
}

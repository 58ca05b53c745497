//! The call session contract consumed by module runners.

use std::time::Duration;

use callflow_flow::{ModuleId, ModuleType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Events emitted while a call runs.
///
/// Modules emit the events describing their own effects; the session emits
/// prompt and input events and the driving loop emits module and call
/// lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
  ModuleEntered {
    module_id: ModuleId,
    module_type: ModuleType,
  },
  Prompt {
    text: String,
    ssml: bool,
  },
  InputReceived {
    input: Option<String>,
    encrypted: bool,
  },
  AttributeUpdated {
    key: String,
    value: serde_json::Value,
  },
  ExternalInvoked {
    name: String,
    payload: serde_json::Value,
    response: Option<String>,
    error: Option<String>,
  },
  QueueTransfer {
    queue_arn: Option<String>,
    queue_name: Option<String>,
  },
  FlowTransfer {
    flow_name: String,
  },
  CallEnded,
}

/// Result of an external invocation that reached the resource.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
  /// The resource returned this JSON document.
  Success(String),
  /// The resource reported a business failure.
  Failed(String),
}

/// The invocation itself could not be carried out.
#[derive(Debug, Error)]
pub enum InvokeError {
  #[error("external resource not found: {0}")]
  NotFound(String),

  #[error("invocation failed: {message}")]
  Transport { message: String },
}

/// What a module needs to interact with the ongoing call.
///
/// Values in the three namespaces are JSON so that external results can keep
/// their structure; prompt resolution renders them to text.
pub trait CallConnector {
  /// Play text (or SSML) to the caller.
  fn send(&mut self, text: &str, ssml: bool);

  /// Wait for up to `max_digits` of caller input. `None` means no input
  /// arrived before `timeout`.
  fn receive(&mut self, max_digits: usize, timeout: Duration, encrypt: bool) -> Option<String>;

  fn emit(&mut self, event: Event);

  fn get_external(&self, key: &str) -> Option<serde_json::Value>;
  fn set_external(&mut self, key: &str, value: serde_json::Value);
  fn clear_external(&mut self);

  fn get_contact_data(&self, key: &str) -> Option<serde_json::Value>;
  fn set_contact_data(&mut self, key: &str, value: serde_json::Value);
  /// All contact attributes, for building external payloads.
  fn contact_data(&self) -> serde_json::Map<String, serde_json::Value>;

  fn get_system(&self, key: &str) -> Option<serde_json::Value>;
  fn set_system(&mut self, key: &str, value: serde_json::Value);

  fn invoke_external(
    &mut self,
    name: &str,
    payload: serde_json::Value,
  ) -> Result<InvocationOutcome, InvokeError>;

  /// Entry module of another flow, for flow transfers.
  fn flow_start(&self, flow_name: &str) -> Option<ModuleId>;

  /// Whether the named hours of operation are currently open. `None` when
  /// the hours are unknown.
  fn in_hours(&self, hours_name: &str) -> Option<bool>;
}

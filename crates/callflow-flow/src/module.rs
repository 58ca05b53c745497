use std::fmt;

use serde::{Deserialize, Serialize};

use crate::branch::Branches;
use crate::id::ModuleId;
use crate::parameter::Parameters;

/// The type tag of a module.
///
/// Any tag outside the implemented set is kept verbatim in `Other` so that
/// error messages and events can still name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleType {
  Disconnect,
  Transfer,
  PlayPrompt,
  SetQueue,
  StoreUserInput,
  GetUserInput,
  CheckAttribute,
  SetAttributes,
  InvokeExternalResource,
  CheckHoursOfOperation,
  Other(String),
}

impl ModuleType {
  pub fn as_str(&self) -> &str {
    match self {
      ModuleType::Disconnect => "Disconnect",
      ModuleType::Transfer => "Transfer",
      ModuleType::PlayPrompt => "PlayPrompt",
      ModuleType::SetQueue => "SetQueue",
      ModuleType::StoreUserInput => "StoreUserInput",
      ModuleType::GetUserInput => "GetUserInput",
      ModuleType::CheckAttribute => "CheckAttribute",
      ModuleType::SetAttributes => "SetAttributes",
      ModuleType::InvokeExternalResource => "InvokeExternalResource",
      ModuleType::CheckHoursOfOperation => "CheckHoursOfOperation",
      ModuleType::Other(tag) => tag,
    }
  }

  /// Whether the tag belongs to the implemented set.
  pub fn is_known(&self) -> bool {
    !matches!(self, ModuleType::Other(_))
  }
}

impl From<String> for ModuleType {
  fn from(tag: String) -> Self {
    match tag.as_str() {
      "Disconnect" => ModuleType::Disconnect,
      "Transfer" => ModuleType::Transfer,
      "PlayPrompt" => ModuleType::PlayPrompt,
      "SetQueue" => ModuleType::SetQueue,
      "StoreUserInput" => ModuleType::StoreUserInput,
      "GetUserInput" => ModuleType::GetUserInput,
      "CheckAttribute" => ModuleType::CheckAttribute,
      "SetAttributes" => ModuleType::SetAttributes,
      "InvokeExternalResource" => ModuleType::InvokeExternalResource,
      "CheckHoursOfOperation" => ModuleType::CheckHoursOfOperation,
      _ => ModuleType::Other(tag),
    }
  }
}

impl From<&str> for ModuleType {
  fn from(tag: &str) -> Self {
    ModuleType::from(tag.to_string())
  }
}

impl From<ModuleType> for String {
  fn from(module_type: ModuleType) -> Self {
    match module_type {
      ModuleType::Other(tag) => tag,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for ModuleType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One node of a contact flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
  pub id: ModuleId,
  #[serde(rename = "type")]
  pub module_type: ModuleType,
  /// Transfer target ("Flow" or "Queue"), only present on transfer modules.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target: Option<String>,
  #[serde(default)]
  pub branches: Branches,
  #[serde(default)]
  pub parameters: Parameters,
}

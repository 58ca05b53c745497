use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a module within a flow.
///
/// Opaque to the engine: only compared for equality and used as the unit of
/// "next step". An empty identifier is a valid value and is never treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ModuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ModuleId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl From<String> for ModuleId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

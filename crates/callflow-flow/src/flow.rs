use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::graph::Graph;
use crate::id::ModuleId;
use crate::module::Module;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// A decoded contact flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
  pub start: ModuleId,
  #[serde(default)]
  pub modules: Vec<Module>,
  #[serde(default)]
  pub metadata: FlowMetadata,
}

impl Flow {
  /// Decode a flow from its exported JSON document.
  pub fn from_json(json: &str) -> Result<Self, FlowError> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn name(&self) -> Option<&str> {
    self.metadata.name.as_deref()
  }

  /// Get a module by ID.
  pub fn get_module(&self, id: &ModuleId) -> Option<&Module> {
    self.modules.iter().find(|m| &m.id == id)
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.modules)
  }

  /// Check structural consistency: unique ids, a known start module and
  /// branch transitions that stay inside the flow.
  ///
  /// Transitions into other flows are not expressible in a flow document,
  /// so any transition to an unknown id is reported.
  pub fn validate(&self) -> Result<(), FlowError> {
    let mut seen = HashSet::new();
    for module in &self.modules {
      if !seen.insert(&module.id) {
        return Err(FlowError::DuplicateModule(module.id.to_string()));
      }
    }

    if !seen.contains(&self.start) {
      return Err(FlowError::StartNotFound(self.start.to_string()));
    }

    if let Some((from, to)) = self.graph().dangling().first() {
      return Err(FlowError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
      });
    }

    Ok(())
  }
}

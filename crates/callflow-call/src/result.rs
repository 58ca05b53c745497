use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::call::Prompt;
use callflow_module::Event;

/// Result of a simulated call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
  /// Unique call ID.
  pub call_id: String,
  /// Flow the call entered.
  pub flow_name: String,
  /// Modules run, including the last one.
  pub steps: usize,
  /// Prompts in the order they were played.
  pub prompts: Vec<Prompt>,
  pub events: Vec<Event>,
  /// Final contact attributes.
  pub attributes: BTreeMap<String, Value>,
  /// Final system variables.
  pub system: BTreeMap<String, Value>,
  /// Values stored by the last external invocation.
  pub external: BTreeMap<String, Value>,
}

impl CallResult {
  /// The prompt texts, for transcript style assertions and output.
  pub fn transcript(&self) -> Vec<&str> {
    self.prompts.iter().map(|p| p.text.as_str()).collect()
  }
}

pub(crate) fn sorted(map: HashMap<String, Value>) -> BTreeMap<String, Value> {
  map.into_iter().collect()
}

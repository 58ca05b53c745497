use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ModuleId;

/// The outcome a branch is taken for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BranchCondition {
  Success,
  Error,
  NoMatch,
  Timeout,
  Evaluate,
  True,
  False,
  AtCapacity,
  Other(String),
}

impl BranchCondition {
  pub fn as_str(&self) -> &str {
    match self {
      BranchCondition::Success => "Success",
      BranchCondition::Error => "Error",
      BranchCondition::NoMatch => "NoMatch",
      BranchCondition::Timeout => "Timeout",
      BranchCondition::Evaluate => "Evaluate",
      BranchCondition::True => "True",
      BranchCondition::False => "False",
      BranchCondition::AtCapacity => "AtCapacity",
      BranchCondition::Other(s) => s,
    }
  }
}

impl From<String> for BranchCondition {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Success" => BranchCondition::Success,
      "Error" => BranchCondition::Error,
      "NoMatch" => BranchCondition::NoMatch,
      "Timeout" => BranchCondition::Timeout,
      "Evaluate" => BranchCondition::Evaluate,
      "True" => BranchCondition::True,
      "False" => BranchCondition::False,
      "AtCapacity" => BranchCondition::AtCapacity,
      _ => BranchCondition::Other(s),
    }
  }
}

impl From<BranchCondition> for String {
  fn from(condition: BranchCondition) -> Self {
    match condition {
      BranchCondition::Other(s) => s,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for BranchCondition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Comparison used by `Evaluate` branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
  Equals,
  GreaterThan,
  GreaterThanOrEqualTo,
  LessThan,
  LessThanOrEqualTo,
  Contains,
  Other(String),
}

impl From<String> for ConditionType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Equals" => ConditionType::Equals,
      "GreaterThan" => ConditionType::GreaterThan,
      "GreaterThanOrEqualTo" => ConditionType::GreaterThanOrEqualTo,
      "LessThan" => ConditionType::LessThan,
      "LessThanOrEqualTo" => ConditionType::LessThanOrEqualTo,
      "Contains" => ConditionType::Contains,
      _ => ConditionType::Other(s),
    }
  }
}

impl ConditionType {
  pub fn as_str(&self) -> &str {
    match self {
      ConditionType::Equals => "Equals",
      ConditionType::GreaterThan => "GreaterThan",
      ConditionType::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
      ConditionType::LessThan => "LessThan",
      ConditionType::LessThanOrEqualTo => "LessThanOrEqualTo",
      ConditionType::Contains => "Contains",
      ConditionType::Other(s) => s,
    }
  }
}

impl From<ConditionType> for String {
  fn from(condition_type: ConditionType) -> Self {
    match condition_type {
      ConditionType::Other(s) => s,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for ConditionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A named outcome of a module, linked to the next module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
  pub condition: BranchCondition,
  /// Absent means the outcome has no outgoing link.
  #[serde(default)]
  pub transition: Option<ModuleId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition_type: Option<ConditionType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition_value: Option<String>,
}

impl Branch {
  pub fn new(condition: BranchCondition, transition: impl Into<ModuleId>) -> Self {
    Self {
      condition,
      transition: Some(transition.into()),
      condition_type: None,
      condition_value: None,
    }
  }
}

/// The outgoing branches of a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branches(Vec<Branch>);

impl Branches {
  pub fn get(&self, condition: &BranchCondition) -> Option<&Branch> {
    self.0.iter().find(|b| &b.condition == condition)
  }

  /// Next module for an outcome.
  ///
  /// `None` when the branch or its transition is absent. An empty
  /// transition is returned as-is.
  pub fn link(&self, condition: &BranchCondition) -> Option<ModuleId> {
    self.get(condition).and_then(|b| b.transition.clone())
  }

  /// `Evaluate` branches in document order.
  pub fn evaluations(&self) -> impl Iterator<Item = &Branch> {
    self
      .0
      .iter()
      .filter(|b| b.condition == BranchCondition::Evaluate)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Branch> {
    self.0.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

use std::cmp::Ordering;

use callflow_flow::{BranchCondition, ConditionType, Module, ModuleId, ModuleType};
use tracing::debug;

use super::{require_link, require_parameter, require_type};
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::resolve::{CallLookup, Lookup, Namespace};
use crate::runner::Runner;

/// Routes on the value of a contact attribute, system variable or external
/// value.
#[derive(Debug, Clone)]
pub struct CheckAttribute(Module);

impl From<Module> for CheckAttribute {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for CheckAttribute {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::CheckAttribute)?;

    let namespace: Namespace = require_parameter(module, "Namespace")?.text()?.parse()?;
    let key = require_parameter(module, "Attribute")?.text()?;

    let Some(actual) = CallLookup(&*call).lookup_text(namespace, key) else {
      debug!(module_id = %module.id, namespace = %namespace, key, "attribute not set");
      return require_link(module, BranchCondition::NoMatch).map(Some);
    };

    for branch in module.branches.evaluations() {
      let (Some(condition_type), Some(expected)) =
        (&branch.condition_type, branch.condition_value.as_deref())
      else {
        continue;
      };

      if matches(condition_type, &actual, expected) {
        debug!(
          module_id = %module.id,
          value = %actual,
          condition = %condition_type,
          expected,
          "attribute condition matched"
        );
        return branch
          .transition
          .clone()
          .map(Some)
          .ok_or_else(|| ModuleError::MissingBranch {
            module_id: module.id.clone(),
            condition: BranchCondition::Evaluate,
          });
      }
    }

    require_link(module, BranchCondition::NoMatch).map(Some)
  }
}

/// Compare `actual` against a branch's expected value.
///
/// Ordering comparisons are numeric when both sides parse as numbers and
/// lexical otherwise.
fn matches(condition_type: &ConditionType, actual: &str, expected: &str) -> bool {
  let ordering = || match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
    (Ok(a), Ok(b)) => a.partial_cmp(&b),
    _ => Some(actual.cmp(expected)),
  };

  match condition_type {
    ConditionType::Equals => ordering() == Some(Ordering::Equal),
    ConditionType::GreaterThan => ordering() == Some(Ordering::Greater),
    ConditionType::GreaterThanOrEqualTo => {
      matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
    }
    ConditionType::LessThan => ordering() == Some(Ordering::Less),
    ConditionType::LessThanOrEqualTo => {
      matches!(ordering(), Some(Ordering::Less | Ordering::Equal))
    }
    ConditionType::Contains => actual.contains(expected),
    ConditionType::Other(_) => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modules::test_call::{TestCall, module};
  use serde_json::json;

  fn check(namespace: &str, attribute: &str) -> Module {
    module(&format!(
      r#"{{
        "id":"check",
        "type":"CheckAttribute",
        "branches":[
          {{"condition":"Evaluate","conditionType":"Equals","conditionValue":"gold","transition":"gold"}},
          {{"condition":"Evaluate","conditionType":"Contains","conditionValue":"silver","transition":"silver"}},
          {{"condition":"Evaluate","conditionType":"GreaterThan","conditionValue":"100","transition":"vip"}},
          {{"condition":"NoMatch","transition":"standard"}}
        ],
        "parameters":[
          {{"name":"Namespace","value":"{namespace}"}},
          {{"name":"Attribute","value":"{attribute}"}}
        ]
      }}"#
    ))
  }

  #[test]
  fn test_wrong_module() {
    let m = module(r#"{"id":"a","type":"SetAttributes"}"#);

    let err = CheckAttribute::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type SetAttributes being run as CheckAttribute"
    );
  }

  #[test]
  fn test_missing_attribute() {
    let m = module(
      r#"{"id":"a","type":"CheckAttribute","parameters":[{"name":"Namespace","value":"Attributes"}]}"#,
    );

    let err = CheckAttribute::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(err.to_string(), "missing parameter Attribute");
  }

  #[test]
  fn test_unknown_namespace() {
    let err = CheckAttribute::from(check("Computer", "tier"))
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(err.to_string(), "unknown namespace 'Computer'");
  }

  #[test]
  fn test_numeric_comparison() {
    let mut call = TestCall::default();
    call.external.insert("spend".into(), json!(250));

    let next = CheckAttribute::from(check("External", "spend"))
      .run(&mut call)
      .unwrap();
    assert_eq!(next, Some(ModuleId::from("vip")));
  }

  #[test]
  fn test_numeric_not_lexical() {
    // "9" > "100" lexically but not numerically.
    let mut call = TestCall::with_contact_data(&[("spend", "9")]);

    let next = CheckAttribute::from(check("Attributes", "spend"))
      .run(&mut call)
      .unwrap();
    assert_eq!(next, Some(ModuleId::from("standard")));
  }

  #[test]
  fn test_string_equals() {
    let mut call = TestCall::with_contact_data(&[("tier", "gold")]);

    let next = CheckAttribute::from(check("Attributes", "tier"))
      .run(&mut call)
      .unwrap();
    assert_eq!(next, Some(ModuleId::from("gold")));
  }

  #[test]
  fn test_contains() {
    let mut call = TestCall::with_contact_data(&[("tier", "silver-plus")]);

    let next = CheckAttribute::from(check("User Defined", "tier"))
      .run(&mut call)
      .unwrap();
    assert_eq!(next, Some(ModuleId::from("silver")));
  }

  #[test]
  fn test_unset_attribute_is_no_match() {
    let next = CheckAttribute::from(check("System", "Queue name"))
      .run(&mut TestCall::default())
      .unwrap();
    assert_eq!(next, Some(ModuleId::from("standard")));
  }

  #[test]
  fn test_ordering_conditions() {
    assert!(matches(&ConditionType::GreaterThanOrEqualTo, "5", "5.0"));
    assert!(matches(&ConditionType::LessThan, "2", "10"));
    assert!(matches(&ConditionType::LessThanOrEqualTo, "apple", "banana"));
    assert!(!matches(&ConditionType::Other("Regex".into()), "a", "a"));
  }
}

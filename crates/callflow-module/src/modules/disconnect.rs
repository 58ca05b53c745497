use callflow_flow::{Module, ModuleId, ModuleType};

use super::require_type;
use crate::connector::CallConnector;
use crate::error::ModuleError;
use crate::runner::Runner;

/// Ends the call.
#[derive(Debug, Clone)]
pub struct Disconnect(Module);

impl From<Module> for Disconnect {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for Disconnect {
  fn run(&self, _call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    require_type(&self.0, ModuleType::Disconnect)?;
    Ok(None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modules::test_call::{TestCall, module};

  #[test]
  fn test_wrong_module() {
    let m = module(
      r#"{
        "id":"43dcc4f2-3392-4a38-90ed-0216f8594ea8",
        "type":"Transfer"
      }"#,
    );

    let err = Disconnect::from(m)
      .run(&mut TestCall::default())
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "module of type Transfer being run as Disconnect"
    );
  }

  #[test]
  fn test_terminates() {
    let m = module(
      r#"{
        "id":"55c7b51c-ab55-4c63-ac42-235b4a0f904f",
        "type":"Disconnect",
        "branches":[],
        "parameters":[]
      }"#,
    );

    let next = Disconnect::from(m).run(&mut TestCall::default()).unwrap();
    assert_eq!(next, None);
  }

  #[test]
  fn test_terminates_despite_branches() {
    let m = module(
      r#"{
        "id":"55c7b51c-ab55-4c63-ac42-235b4a0f904f",
        "type":"Disconnect",
        "branches":[{"condition":"Success","transition":"00000000-0000-4000-0000-000000000001"}],
        "parameters":[{"name":"Text","value":"bye"}]
      }"#,
    );

    let next = Disconnect::from(m).run(&mut TestCall::default()).unwrap();
    assert_eq!(next, None);
  }
}

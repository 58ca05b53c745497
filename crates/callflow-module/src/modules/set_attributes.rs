use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType};
use tracing::{debug, warn};

use super::{parameter_value, require_link, require_type};
use crate::connector::{CallConnector, Event};
use crate::error::ModuleError;
use crate::runner::Runner;

/// Writes contact attributes.
///
/// Every `Attribute` entry names the attribute in `key`. Its value is
/// literal, or when the entry has a `namespace`, the key of a value to copy
/// from that namespace. Nothing is written unless every value resolves.
#[derive(Debug, Clone)]
pub struct SetAttributes(Module);

impl From<Module> for SetAttributes {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for SetAttributes {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::SetAttributes)?;

    let entries: Vec<_> = module.parameters.all("Attribute").collect();
    if entries.is_empty() {
      return Err(ModuleError::MissingParameter("Attribute".to_string()));
    }

    let mut updates = Vec::with_capacity(entries.len());
    for entry in entries {
      let key = entry
        .key
        .as_deref()
        .ok_or_else(|| ModuleError::MissingParameter("Attribute key".to_string()))?;

      match parameter_value(entry, &*call)? {
        Some(value) => updates.push((key, value)),
        None => {
          warn!(
            module_id = %module.id,
            key,
            namespace = entry.namespace.as_deref().unwrap_or_default(),
            "attribute value could not be resolved"
          );
          return require_link(module, BranchCondition::Error).map(Some);
        }
      }
    }

    for (key, value) in updates {
      debug!(module_id = %module.id, key, value = %value, "attribute set");
      call.set_contact_data(key, value.clone());
      call.emit(Event::AttributeUpdated {
        key: key.to_string(),
        value,
      });
    }

    require_link(module, BranchCondition::Success).map(Some)
  }
}

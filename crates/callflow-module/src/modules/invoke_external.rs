use callflow_flow::{BranchCondition, Module, ModuleId, ModuleType, system};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::{parameter_value, require_link, require_parameter, require_type};
use crate::connector::{CallConnector, Event, InvocationOutcome};
use crate::error::ModuleError;
use crate::runner::Runner;

/// Invokes an external resource (a Lambda function in the exported flows)
/// and stores the object it returns in the external namespace.
#[derive(Debug, Clone)]
pub struct InvokeExternalResource(Module);

impl From<Module> for InvokeExternalResource {
  fn from(module: Module) -> Self {
    Self(module)
  }
}

impl Runner for InvokeExternalResource {
  fn run(&self, call: &mut dyn CallConnector) -> Result<Option<ModuleId>, ModuleError> {
    let module = &self.0;
    require_type(module, ModuleType::InvokeExternalResource)?;
    let name = require_parameter(module, "FunctionArn")?.text()?;

    let mut parameters = Map::new();
    for entry in module.parameters.all("Parameter") {
      let key = entry
        .key
        .as_deref()
        .ok_or_else(|| ModuleError::MissingParameter("Parameter key".to_string()))?;
      let Some(value) = parameter_value(entry, &*call)? else {
        warn!(module_id = %module.id, key, "invocation parameter could not be resolved");
        return require_link(module, BranchCondition::Error).map(Some);
      };
      parameters.insert(key.to_string(), value);
    }

    let payload = contact_flow_event(&*call, parameters);
    debug!(module_id = %module.id, function = name, "invoking external resource");

    let outcome = match call.invoke_external(name, payload.clone()) {
      Ok(outcome) => outcome,
      Err(source) => {
        call.emit(Event::ExternalInvoked {
          name: name.to_string(),
          payload,
          response: None,
          error: Some(source.to_string()),
        });
        return Err(ModuleError::Invocation {
          name: name.to_string(),
          source,
        });
      }
    };

    let (response, error) = match &outcome {
      InvocationOutcome::Success(body) => (Some(body.clone()), None),
      InvocationOutcome::Failed(message) => (None, Some(message.clone())),
    };
    call.emit(Event::ExternalInvoked {
      name: name.to_string(),
      payload,
      response,
      error,
    });

    let output = match outcome {
      InvocationOutcome::Success(body) => match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(output)) => output,
        _ => {
          warn!(module_id = %module.id, function = name, "external resource returned a non-object response");
          return require_link(module, BranchCondition::Error).map(Some);
        }
      },
      InvocationOutcome::Failed(message) => {
        warn!(module_id = %module.id, function = name, error = %message, "external resource failed");
        return require_link(module, BranchCondition::Error).map(Some);
      }
    };

    call.clear_external();
    for (key, value) in output {
      call.set_external(&key, value);
    }

    require_link(module, BranchCondition::Success).map(Some)
  }
}

/// The event document an external resource receives.
fn contact_flow_event(call: &dyn CallConnector, parameters: Map<String, Value>) -> Value {
  let queue = match call.get_system(system::QUEUE_ARN) {
    Some(arn) => json!({
      "ARN": arn,
      "Name": call.get_system(system::QUEUE_NAME).unwrap_or(Value::Null),
    }),
    None => Value::Null,
  };

  json!({
    "Details": {
      "ContactData": {
        "Attributes": call.contact_data(),
        "ContactId": call.get_system(system::CONTACT_ID).unwrap_or(Value::Null),
        "CustomerEndpoint": {
          "Address": call.get_system(system::CUSTOMER_NUMBER).unwrap_or(Value::Null),
          "Type": "TELEPHONE_NUMBER",
        },
        "Queue": queue,
      },
      "Parameters": parameters,
    },
    "Name": "ContactFlowEvent",
  })
}

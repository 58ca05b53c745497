//! The driving loop.

use std::collections::HashMap;
use std::sync::Arc;

use callflow_flow::{Flow, Module, ModuleId};
use callflow_module::{CallConnector, Event, Runner, make_runner};
use tracing::{debug, error, info, instrument};

use crate::call::{Call, CallOptions};
use crate::config::SimulatorConfig;
use crate::error::SimulatorError;
use crate::events::{CallNotifier, NoopNotifier};
use crate::result::{CallResult, sorted};

/// Runs simulated calls through a set of loaded flows.
///
/// Module ids are unique across all loaded flows, so a flow transfer only
/// needs the start module of the target flow.
pub struct Simulator {
  config: SimulatorConfig,
  modules: HashMap<ModuleId, Module>,
  flow_starts: HashMap<String, ModuleId>,
  notifier: Arc<dyn CallNotifier>,
}

impl Simulator {
  pub fn new(config: SimulatorConfig) -> Self {
    Self {
      config,
      modules: HashMap::new(),
      flow_starts: HashMap::new(),
      notifier: Arc::new(NoopNotifier),
    }
  }

  /// Send the events of every call to `notifier`.
  pub fn with_notifier(mut self, notifier: Arc<dyn CallNotifier>) -> Self {
    self.notifier = notifier;
    self
  }

  /// Load a flow under the name in its metadata.
  pub fn load_flow(&mut self, flow: Flow) -> Result<String, SimulatorError> {
    let name = flow
      .name()
      .map(str::to_string)
      .ok_or_else(|| SimulatorError::UnnamedFlow {
        start: flow.start.clone(),
      })?;
    self.load_flow_as(name.clone(), flow)?;
    Ok(name)
  }

  /// Load a flow under `name`. Nothing is loaded when the flow is invalid or
  /// shares a module id with an already loaded flow.
  pub fn load_flow_as(&mut self, name: impl Into<String>, flow: Flow) -> Result<(), SimulatorError> {
    let name = name.into();
    if self.flow_starts.contains_key(&name) {
      return Err(SimulatorError::DuplicateFlow(name));
    }

    flow.validate().map_err(|source| SimulatorError::InvalidFlow {
      flow: name.clone(),
      source,
    })?;

    if let Some(module) = flow.modules.iter().find(|m| self.modules.contains_key(&m.id)) {
      return Err(SimulatorError::DuplicateModule {
        module_id: module.id.clone(),
        flow: name,
      });
    }

    for module in flow.graph().unreachable(&flow.start) {
      debug!(flow = %name, module_id = %module, "module unreachable from start");
    }

    info!(flow = %name, modules = flow.modules.len(), "flow loaded");
    self.flow_starts.insert(name, flow.start);
    self
      .modules
      .extend(flow.modules.into_iter().map(|m| (m.id.clone(), m)));
    Ok(())
  }

  /// Names of the loaded flows, sorted.
  pub fn flow_names(&self) -> Vec<&str> {
    let mut names: Vec<_> = self.flow_starts.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Run one call from the start of `flow_name` until it ends.
  #[instrument(name = "call", skip(self, options), fields(flow = %flow_name))]
  pub fn run_call(&self, flow_name: &str, options: CallOptions) -> Result<CallResult, SimulatorError> {
    let start = self
      .flow_starts
      .get(flow_name)
      .cloned()
      .ok_or_else(|| SimulatorError::FlowNotFound(flow_name.to_string()))?;

    let call_id = uuid::Uuid::new_v4().to_string();
    info!(call_id = %call_id, flow = %flow_name, "call_started");

    let mut call = Call::new(
      call_id.clone(),
      options,
      &self.config,
      &self.flow_starts,
      self.notifier.as_ref(),
    );

    let steps = match self.drive(&mut call, start) {
      Ok(steps) => {
        info!(call_id = %call_id, steps, "call_completed");
        steps
      }
      Err(e) => {
        error!(call_id = %call_id, error = %e, "call_failed");
        return Err(e);
      }
    };

    let parts = call.into_parts();
    Ok(CallResult {
      call_id,
      flow_name: flow_name.to_string(),
      steps,
      prompts: parts.prompts,
      events: parts.events,
      attributes: sorted(parts.attributes),
      system: sorted(parts.system),
      external: sorted(parts.external),
    })
  }

  /// Run modules until one ends the call. Returns the number of modules run.
  fn drive(&self, call: &mut Call<'_>, start: ModuleId) -> Result<usize, SimulatorError> {
    let mut next = Some(start);
    let mut steps = 0;

    while let Some(module_id) = next {
      if steps >= self.config.max_steps {
        return Err(SimulatorError::StepLimit {
          max_steps: self.config.max_steps,
        });
      }

      let module = self
        .modules
        .get(&module_id)
        .ok_or_else(|| SimulatorError::ModuleNotFound {
          module_id: module_id.clone(),
        })?;
      steps += 1;

      call.emit(Event::ModuleEntered {
        module_id: module_id.clone(),
        module_type: module.module_type.clone(),
      });

      let runner = make_runner(module.clone());
      debug!(call_id = %call.id(), module_id = %module_id, runner = runner.name(), "running module");

      next = runner
        .run(call)
        .map_err(|source| SimulatorError::Module { module_id, source })?;
    }

    call.emit(Event::CallEnded);
    Ok(steps)
  }
}

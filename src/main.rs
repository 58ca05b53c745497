use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use callflow_call::{
  CallOptions, CallResult, CallerInput, ChannelNotifier, Simulator, SimulatorConfig,
};
use callflow_flow::{Flow, ModuleType};
use callflow_module::Event;

/// Callflow - simulate contact flows without a telephony backend
#[derive(Parser)]
#[command(name = "callflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the simulator config (default: ~/.callflow/simulator.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Simulate one call
  Run {
    /// Flow files (exported JSON). Transfers may target any of them.
    #[arg(required = true)]
    flow_files: Vec<PathBuf>,

    /// Flow the call enters (default: the first file's flow)
    #[arg(long)]
    flow: Option<String>,

    /// Caller input, one per prompt that asks for it. `-` is silence.
    #[arg(long = "input", value_name = "DIGITS")]
    inputs: Vec<CallerInput>,

    /// Contact attribute set before the call starts
    #[arg(long = "attribute", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    #[arg(long)]
    customer_number: Option<String>,

    #[arg(long)]
    dialed_number: Option<String>,

    /// Print events to stderr as they happen
    #[arg(long)]
    events: bool,
  },

  /// Check flow files without running them
  Validate {
    #[arg(required = true)]
    flow_files: Vec<PathBuf>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Run {
      flow_files,
      flow,
      inputs,
      attributes,
      customer_number,
      dialed_number,
      events,
    }) => {
      let config = load_config(cli.config.as_deref())?;
      let options = CallOptions {
        inputs,
        attributes: attributes
          .into_iter()
          .map(|(k, v)| (k, serde_json::Value::String(v)))
          .collect(),
        customer_number,
        dialed_number,
      };
      run_call(flow_files, flow, options, config, events)?;
    }
    Some(Commands::Validate { flow_files }) => {
      validate(flow_files)?;
    }
    None => {
      println!("callflow - use --help to see available commands");
    }
  }

  Ok(())
}

fn parse_attribute(s: &str) -> Result<(String, String), String> {
  match s.split_once('=') {
    Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
    _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
  }
}

fn load_config(path: Option<&Path>) -> Result<SimulatorConfig> {
  let path = match path {
    Some(path) => path.to_path_buf(),
    None => {
      let default = dirs::home_dir().map(|home| home.join(".callflow").join("simulator.json"));
      match default.filter(|p| p.exists()) {
        Some(path) => path,
        None => {
          debug!("no simulator config, using defaults");
          return Ok(SimulatorConfig::default());
        }
      }
    }
  };

  debug!(path = %path.display(), "loading simulator config");
  SimulatorConfig::load(&path).context("failed to load simulator config")
}

/// Read and decode flow files. Each flow is named by its metadata, or by the
/// file stem when the metadata has no name.
async fn read_flows(flow_files: &[PathBuf]) -> Result<Vec<(String, Flow)>> {
  let mut flows = Vec::with_capacity(flow_files.len());
  for file in flow_files {
    let content = tokio::fs::read_to_string(file)
      .await
      .with_context(|| format!("failed to read flow file: {}", file.display()))?;

    let flow = Flow::from_json(&content)
      .with_context(|| format!("failed to parse flow file: {}", file.display()))?;

    let name = match flow.name() {
      Some(name) => name.to_string(),
      None => file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("cannot name flow file: {}", file.display()))?,
    };
    flows.push((name, flow));
  }
  Ok(flows)
}

fn load_flows(simulator: &mut Simulator, flows: Vec<(String, Flow)>) -> Result<()> {
  for (name, flow) in flows {
    simulator
      .load_flow_as(name.clone(), flow)
      .with_context(|| format!("failed to load flow '{}'", name))?;
  }
  Ok(())
}

fn run_call(
  flow_files: Vec<PathBuf>,
  flow: Option<String>,
  options: CallOptions,
  config: SimulatorConfig,
  events: bool,
) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_call_async(flow_files, flow, options, config, events).await })
}

async fn run_call_async(
  flow_files: Vec<PathBuf>,
  flow: Option<String>,
  options: CallOptions,
  config: SimulatorConfig,
  events: bool,
) -> Result<()> {
  let flows = read_flows(&flow_files).await?;
  let Some(entry) = flow.or_else(|| flows.first().map(|(name, _)| name.clone())) else {
    bail!("no flow files given");
  };

  let mut simulator = Simulator::new(config);
  load_flows(&mut simulator, flows)?;
  eprintln!("Running flow: {}", entry);

  let sink = events.then(|| -> EventSink {
    Box::new(|event: &Event| eprintln!("{}", describe(event)))
  });
  let result = simulate(simulator, entry, options, sink).await?;

  eprintln!("Call completed: {}", result.call_id);
  eprintln!("Modules run: {}", result.steps);
  for line in result.transcript() {
    eprintln!("  > {}", line);
  }

  println!("{}", serde_json::to_string_pretty(&result)?);

  Ok(())
}

type EventSink = Box<dyn FnMut(&Event) + Send>;

/// Run one call on a blocking thread, handing each event to `sink` as it
/// happens. The sink sees every event of a failed call before the error
/// is returned.
async fn simulate(
  mut simulator: Simulator,
  entry: String,
  options: CallOptions,
  sink: Option<EventSink>,
) -> Result<CallResult> {
  let printer = match sink {
    Some(mut sink) => {
      let (notifier, mut receiver) = ChannelNotifier::channel();
      simulator = simulator.with_notifier(Arc::new(notifier));
      Some(tokio::spawn(async move {
        while let Some(call_event) = receiver.recv().await {
          sink(&call_event.event);
        }
      }))
    }
    None => None,
  };

  // The simulator owns the notifier, so the printer finishes once it is dropped.
  let outcome = tokio::task::spawn_blocking(move || simulator.run_call(&entry, options))
    .await
    .context("call simulation panicked")?;

  if let Some(printer) = printer {
    printer.await.context("event printer panicked")?;
  }
  outcome.context("call failed")
}

fn describe(event: &Event) -> String {
  match event {
    Event::ModuleEntered {
      module_id,
      module_type,
    } => format!("[module] {} ({})", module_id, module_type),
    Event::Prompt { text, ssml: true } => format!("[prompt:ssml] {}", text),
    Event::Prompt { text, ssml: false } => format!("[prompt] {}", text),
    Event::InputReceived { input, .. } => {
      format!("[input] {}", input.as_deref().unwrap_or("<none>"))
    }
    Event::AttributeUpdated { key, value } => format!("[attribute] {} = {}", key, value),
    Event::ExternalInvoked {
      name,
      error: Some(error),
      ..
    } => format!("[external] {} failed: {}", name, error),
    Event::ExternalInvoked { name, .. } => format!("[external] {}", name),
    Event::QueueTransfer { queue_name, .. } => {
      format!("[queue] {}", queue_name.as_deref().unwrap_or("<unnamed>"))
    }
    Event::FlowTransfer { flow_name } => format!("[flow] {}", flow_name),
    Event::CallEnded => "[end]".to_string(),
  }
}

fn validate(flow_files: Vec<PathBuf>) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { validate_async(flow_files).await })
}

async fn validate_async(flow_files: Vec<PathBuf>) -> Result<()> {
  let flows = read_flows(&flow_files).await?;

  let mut transfer_targets = Vec::new();
  for (name, flow) in &flows {
    for module_id in flow.graph().unreachable(&flow.start) {
      eprintln!("warning: {}: module {} is unreachable", name, module_id);
    }
    for module in &flow.modules {
      if module.module_type == ModuleType::Transfer && module.target.as_deref() == Some("Flow") {
        if let Some(target) = module
          .parameters
          .get("ContactFlowId")
          .and_then(|p| p.resource_name.clone())
        {
          transfer_targets.push((name.clone(), module.id.clone(), target));
        }
      }
    }
    for module in flow.modules.iter().filter(|m| !m.module_type.is_known()) {
      eprintln!(
        "note: {}: module {} of type {} is skipped when simulated",
        name, module.id, module.module_type
      );
    }
  }

  let mut simulator = Simulator::new(SimulatorConfig::default());
  load_flows(&mut simulator, flows)?;

  let loaded = simulator.flow_names();
  let mut missing = 0;
  for (flow, module_id, target) in &transfer_targets {
    if !loaded.contains(&target.as_str()) {
      eprintln!(
        "error: {}: module {} transfers to flow '{}', which is not loaded",
        flow, module_id, target
      );
      missing += 1;
    }
  }
  if missing > 0 {
    bail!("{} transfer(s) to unknown flows", missing);
  }

  for name in loaded {
    println!("ok: {}", name);
  }
  Ok(())
}

//! Callflow Call
//!
//! This crate simulates calls through loaded contact flows. A [`Simulator`]
//! owns the flows and configuration; each call gets an in-memory [`Call`]
//! session with scripted caller input, stubbed external resources and
//! configured hours of operation.
//!
//! # Usage
//!
//! ```ignore
//! use callflow_call::{CallOptions, CallerInput, Simulator, SimulatorConfig};
//!
//! let mut simulator = Simulator::new(SimulatorConfig::default());
//! simulator.load_flow(Flow::from_json(&document)?)?;
//!
//! let result = simulator.run_call("Main", CallOptions {
//!   inputs: vec![CallerInput::Digits("1".into())],
//!   ..Default::default()
//! })?;
//! for line in result.transcript() {
//!   println!("{line}");
//! }
//! ```

mod call;
mod config;
mod error;
mod events;
mod result;
mod simulator;

pub use call::{Call, CallOptions, CallerInput, InvalidCallerInput, Prompt};
pub use config::{ConfigError, DEFAULT_MAX_STEPS, ExternalStub, Hours, OpenPeriod, SimulatorConfig};
pub use error::SimulatorError;
pub use events::{CallEvent, CallNotifier, ChannelNotifier, NoopNotifier};
pub use result::CallResult;
pub use simulator::Simulator;

//! Callflow Module
//!
//! This crate provides the module execution engine for callflow: the runner
//! bound to each module type, the dispatcher choosing it, and the prompt
//! variable resolution those runners use.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     make_runner(module)                     │
//! │  - closed match on the type tag                             │
//! │  - unknown types become Passthrough                         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ModuleRunner::run(call)                   │
//! │  - re-checks the type tag, reads parameters                 │
//! │  - acts on the call through CallConnector                   │
//! │  - returns the next module id, or None when the call ends   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       resolve_text                          │
//! │  - replaces $.Namespace.Key references in prompts           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use callflow_module::{Runner, make_runner};
//!
//! let mut next = Some(flow.start.clone());
//! while let Some(id) = next {
//!   let module = flow.get_module(&id).cloned().ok_or("missing module")?;
//!   next = make_runner(module).run(&mut call)?;
//! }
//! ```

mod connector;
mod error;
mod modules;
mod resolve;
mod runner;

pub use connector::{CallConnector, Event, InvocationOutcome, InvokeError};
pub use error::ModuleError;
pub use modules::{
  CheckAttribute, CheckHoursOfOperation, Disconnect, GetUserInput, InvokeExternalResource,
  Passthrough, PlayPrompt, SetAttributes, SetQueue, StoreUserInput, Transfer,
};
pub use resolve::{CallLookup, Lookup, Namespace, Snapshot, UnknownNamespace, render, resolve_text};
pub use runner::{ModuleRunner, Runner, make_runner};

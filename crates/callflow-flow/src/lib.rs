//! Callflow Flow
//!
//! This crate contains the contact flow data model for callflow. A flow is a
//! directed graph of typed modules (blocks) exported from the contact center
//! as a JSON document:
//!
//! ```json
//! {
//!   "start": "0b0f...",
//!   "metadata": { "name": "Main" },
//!   "modules": [
//!     {
//!       "id": "0b0f...",
//!       "type": "PlayPrompt",
//!       "branches": [{ "condition": "Success", "transition": "9c1d..." }],
//!       "parameters": [{ "name": "Text", "value": "Hello $.Attributes.name" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Modules are immutable once decoded. Execution lives in `callflow-module`.

mod branch;
mod error;
mod flow;
mod graph;
mod id;
mod module;
mod parameter;
pub mod system;

pub use branch::{Branch, BranchCondition, Branches, ConditionType};
pub use error::FlowError;
pub use flow::{Flow, FlowMetadata};
pub use graph::Graph;
pub use id::ModuleId;
pub use module::{Module, ModuleType};
pub use parameter::{Parameter, ParameterValue, Parameters};

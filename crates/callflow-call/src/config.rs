//! Simulator configuration.
//!
//! ```json
//! {
//!   "max_steps": 500,
//!   "external": {
//!     "accountLookup": { "output": { "tier": "gold" } },
//!     "arn:aws:lambda:eu-west-2:000000000000:function:broken": { "error": "Unhandled" }
//!   },
//!   "hours": {
//!     "Basic Hours": { "open": true },
//!     "Sales": {
//!       "schedule": [
//!         { "day": "Mon", "open": "09:00", "close": "17:30" },
//!         { "day": "Sat", "open": "10:00", "close": "14:00" }
//!       ]
//!     }
//!   },
//!   "now": "2024-01-15T10:30:00"
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config file: {path}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file: {path}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

pub const DEFAULT_MAX_STEPS: usize = 1000;

fn default_max_steps() -> usize {
  DEFAULT_MAX_STEPS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
  /// Modules a single call may run before it is abandoned.
  #[serde(default = "default_max_steps")]
  pub max_steps: usize,

  /// Stubbed external resources, by function name or ARN.
  #[serde(default)]
  pub external: HashMap<String, ExternalStub>,

  /// Hours of operation, by name.
  #[serde(default)]
  pub hours: HashMap<String, Hours>,

  /// Fixed clock for hours checks. Local time when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub now: Option<NaiveDateTime>,
}

impl Default for SimulatorConfig {
  fn default() -> Self {
    Self {
      max_steps: DEFAULT_MAX_STEPS,
      external: HashMap::new(),
      hours: HashMap::new(),
      now: None,
    }
  }
}

impl SimulatorConfig {
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.display().to_string(),
      source,
    })?;

    Self::from_json(&content).map_err(|source| ConfigError::Parse {
      path: path.display().to_string(),
      source,
    })
  }

  /// The stub for an external resource.
  ///
  /// Looked up by the exact name first, then by the last `:` separated
  /// segment so that a full ARN finds a stub keyed by function name.
  pub fn external_stub(&self, name: &str) -> Option<&ExternalStub> {
    self.external.get(name).or_else(|| {
      let short = name.rsplit(':').next()?;
      self.external.get(short)
    })
  }

  /// The clock hours are checked against.
  pub fn now(&self) -> NaiveDateTime {
    self
      .now
      .unwrap_or_else(|| chrono::Local::now().naive_local())
  }
}

/// What a stubbed external resource answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalStub {
  /// The resource returns this document.
  Output { output: serde_json::Value },
  /// The resource reports a failure.
  Error { error: String },
}

/// Hours of operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hours {
  /// Always open or always closed.
  Fixed { open: bool },
  /// Open during the listed periods.
  Schedule { schedule: Vec<OpenPeriod> },
}

impl Hours {
  pub fn is_open(&self, at: NaiveDateTime) -> bool {
    match self {
      Hours::Fixed { open } => *open,
      Hours::Schedule { schedule } => schedule.iter().any(|p| p.contains(at)),
    }
  }
}

/// A period on one weekday. Periods end at midnight at the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPeriod {
  pub day: Weekday,
  #[serde(deserialize_with = "clock_time")]
  pub open: NaiveTime,
  #[serde(deserialize_with = "clock_time")]
  pub close: NaiveTime,
}

impl OpenPeriod {
  pub fn contains(&self, at: NaiveDateTime) -> bool {
    if at.weekday() != self.day {
      return false;
    }
    let time = at.time();
    // A close at or before the open runs to the end of the day.
    time >= self.open && (self.close <= self.open || time < self.close)
  }
}

/// `HH:MM` or `HH:MM:SS`.
fn clock_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
  D: Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  NaiveTime::parse_from_str(&s, "%H:%M:%S")
    .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
    .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    // 2024-01-15 is a Monday.
    NaiveDate::from_ymd_opt(2024, 1, day)
      .unwrap()
      .and_hms_opt(hour, min, 0)
      .unwrap()
  }

  #[test]
  fn test_defaults() {
    let config = SimulatorConfig::from_json("{}").unwrap();
    assert_eq!(config, SimulatorConfig::default());
    assert_eq!(config.max_steps, 1000);
  }

  #[test]
  fn test_external_stub_lookup() {
    let config = SimulatorConfig::from_json(
      r#"{"external": {
        "accountLookup": {"output": {"tier": "gold"}},
        "arn:aws:lambda:eu-west-2:0:function:broken": {"error": "Unhandled"}
      }}"#,
    )
    .unwrap();

    assert!(matches!(
      config.external_stub("arn:aws:lambda:eu-west-2:0:function:accountLookup"),
      Some(ExternalStub::Output { .. })
    ));
    assert_eq!(
      config.external_stub("arn:aws:lambda:eu-west-2:0:function:broken"),
      Some(&ExternalStub::Error {
        error: "Unhandled".into()
      })
    );
    assert_eq!(config.external_stub("missing"), None);
  }

  #[test]
  fn test_schedule() {
    let config = SimulatorConfig::from_json(
      r#"{"hours": {
        "Sales": {"schedule": [
          {"day": "Mon", "open": "09:00", "close": "17:30"},
          {"day": "Sat", "open": "22:00:00", "close": "00:00"}
        ]},
        "Closed": {"open": false}
      }}"#,
    )
    .unwrap();

    let sales = &config.hours["Sales"];
    assert!(sales.is_open(at(15, 9, 0)));
    assert!(sales.is_open(at(15, 17, 29)));
    assert!(!sales.is_open(at(15, 17, 30)));
    assert!(!sales.is_open(at(16, 10, 0)));
    assert!(sales.is_open(at(20, 23, 59)));
    assert!(!config.hours["Closed"].is_open(at(15, 12, 0)));
  }

  #[test]
  fn test_fixed_clock() {
    let config = SimulatorConfig::from_json(r#"{"now": "2024-01-15T10:30:00"}"#).unwrap();
    assert_eq!(config.now(), at(15, 10, 30));
  }

  #[test]
  fn test_invalid_time() {
    let err = SimulatorConfig::from_json(
      r#"{"hours": {"x": {"schedule": [{"day": "Mon", "open": "9am", "close": "17:00"}]}}}"#,
    );
    assert!(err.is_err());
  }
}

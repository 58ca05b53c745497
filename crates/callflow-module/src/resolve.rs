//! Prompt variable resolution.
//!
//! Prompt text may reference call state with path-style references:
//!
//! ```text
//! Thanks for your call, $.Attributes.name.
//! The estimated wait time is $.User Defined.estimatedWaitTime minutes.
//! You are calling from $.System.Customer Number
//! ```
//!
//! Each reference to a known namespace whose key is found is replaced by the
//! current value. Anything else (unknown namespaces, absent keys, null
//! values) is left verbatim so a prompt is always played.
//!
//! # Keys
//! A key is a run of word characters, with `-` allowed only between them.
//! Keys such as `Customer Number` contain spaces, so when a reference is
//! followed by more words the longest run that resolves wins and the
//! remaining words are kept as text. Punctuation ends a key, so the period
//! in `$.Attributes.name.` and the hyphen in `$.Attributes.name-` stay in
//! the output.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::connector::CallConnector;

static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\$\.(User Defined|Attributes|External|System)\.(\w+(?:-\w+)*(?: \w+(?:-\w+)*)*)")
    .expect("reference pattern is valid")
});

/// A namespace of call state addressable from flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
  /// Contact attributes.
  Attributes,
  /// System variables.
  System,
  /// Results of the last external invocation.
  External,
  /// Contact attributes, as labelled in the flow editor. Falls back to the
  /// external store.
  UserDefined,
}

impl Namespace {
  pub fn as_str(&self) -> &'static str {
    match self {
      Namespace::Attributes => "Attributes",
      Namespace::System => "System",
      Namespace::External => "External",
      Namespace::UserDefined => "User Defined",
    }
  }
}

impl fmt::Display for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown namespace '{0}'")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
  type Err = UnknownNamespace;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Attributes" => Ok(Namespace::Attributes),
      "System" => Ok(Namespace::System),
      "External" => Ok(Namespace::External),
      "User Defined" => Ok(Namespace::UserDefined),
      other => Err(UnknownNamespace(other.to_string())),
    }
  }
}

/// A read-only view of the three namespaces.
pub trait Lookup {
  fn attribute(&self, key: &str) -> Option<serde_json::Value>;
  fn system(&self, key: &str) -> Option<serde_json::Value>;
  fn external(&self, key: &str) -> Option<serde_json::Value>;

  fn lookup(&self, namespace: Namespace, key: &str) -> Option<serde_json::Value> {
    match namespace {
      Namespace::Attributes => self.attribute(key),
      Namespace::System => self.system(key),
      Namespace::External => self.external(key),
      Namespace::UserDefined => self.attribute(key).or_else(|| self.external(key)),
    }
  }

  /// Look up a value and render it as text. Null counts as absent.
  fn lookup_text(&self, namespace: Namespace, key: &str) -> Option<String> {
    self.lookup(namespace, key).and_then(|v| render(&v))
  }
}

/// Fixed maps, one per namespace.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  pub attributes: HashMap<String, serde_json::Value>,
  pub system: HashMap<String, serde_json::Value>,
  pub external: HashMap<String, serde_json::Value>,
}

impl Lookup for Snapshot {
  fn attribute(&self, key: &str) -> Option<serde_json::Value> {
    self.attributes.get(key).cloned()
  }

  fn system(&self, key: &str) -> Option<serde_json::Value> {
    self.system.get(key).cloned()
  }

  fn external(&self, key: &str) -> Option<serde_json::Value> {
    self.external.get(key).cloned()
  }
}

/// Reads the namespaces of a live call.
pub struct CallLookup<'a>(pub &'a dyn CallConnector);

impl Lookup for CallLookup<'_> {
  fn attribute(&self, key: &str) -> Option<serde_json::Value> {
    self.0.get_contact_data(key)
  }

  fn system(&self, key: &str) -> Option<serde_json::Value> {
    self.0.get_system(key)
  }

  fn external(&self, key: &str) -> Option<serde_json::Value> {
    self.0.get_external(key)
  }
}

/// Render a stored value as prompt text.
pub fn render(value: &serde_json::Value) -> Option<String> {
  match value {
    serde_json::Value::Null => None,
    serde_json::Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

/// Replace every resolvable reference in `text`.
pub fn resolve_text(text: &str, lookup: &dyn Lookup) -> String {
  if !text.contains("$.") {
    return text.to_string();
  }

  REFERENCE_REGEX
    .replace_all(text, |caps: &Captures| resolve_reference(caps, lookup))
    .into_owned()
}

fn resolve_reference(caps: &Captures, lookup: &dyn Lookup) -> String {
  let original = &caps[0];
  let Ok(namespace) = caps[1].parse::<Namespace>() else {
    return original.to_string();
  };

  let words: Vec<&str> = caps[2].split(' ').collect();
  for len in (1..=words.len()).rev() {
    let key = words[..len].join(" ");
    if let Some(value) = lookup.lookup_text(namespace, &key) {
      let rest = &words[len..];
      if rest.is_empty() {
        return value;
      }
      return format!("{} {}", value, rest.join(" "));
    }
  }

  warn!(reference = %original, "unresolved prompt reference left as text");
  original.to_string()
}

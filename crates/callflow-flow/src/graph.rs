use std::collections::{HashMap, HashSet, VecDeque};

use crate::id::ModuleId;
use crate::module::Module;

/// Graph structure for traversal and analysis of a flow.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: module id -> modules its branches lead to.
  adjacency: HashMap<ModuleId, Vec<ModuleId>>,
  /// Reverse adjacency: module id -> modules with a branch leading here.
  reverse_adjacency: HashMap<ModuleId, Vec<ModuleId>>,
  /// Transitions whose target is not a module of this graph.
  dangling: Vec<(ModuleId, ModuleId)>,
}

impl Graph {
  /// Build a graph from the branch transitions of the given modules.
  pub fn new<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Self {
    let modules: Vec<&Module> = modules.into_iter().collect();
    let mut adjacency: HashMap<ModuleId, Vec<ModuleId>> = HashMap::new();
    let mut reverse_adjacency: HashMap<ModuleId, Vec<ModuleId>> = HashMap::new();

    for module in &modules {
      adjacency.entry(module.id.clone()).or_default();
      reverse_adjacency.entry(module.id.clone()).or_default();
    }

    let mut dangling = Vec::new();
    for module in &modules {
      for to in module.branches.iter().filter_map(|b| b.transition.as_ref()) {
        if !adjacency.contains_key(to) {
          dangling.push((module.id.clone(), to.clone()));
          continue;
        }
        adjacency.entry(module.id.clone()).or_default().push(to.clone());
        reverse_adjacency
          .entry(to.clone())
          .or_default()
          .push(module.id.clone());
      }
    }

    Self {
      adjacency,
      reverse_adjacency,
      dangling,
    }
  }

  /// Get downstream modules for a given module.
  pub fn downstream(&self, id: &ModuleId) -> &[ModuleId] {
    self
      .adjacency
      .get(id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream modules for a given module.
  pub fn upstream(&self, id: &ModuleId) -> &[ModuleId] {
    self
      .reverse_adjacency
      .get(id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Transitions pointing outside the graph, as (from, to) pairs.
  pub fn dangling(&self) -> &[(ModuleId, ModuleId)] {
    &self.dangling
  }

  /// Every module reachable from `start`, including `start`.
  pub fn reachable_from(&self, start: &ModuleId) -> HashSet<ModuleId> {
    let mut seen = HashSet::new();
    if !self.adjacency.contains_key(start) {
      return seen;
    }

    let mut queue = VecDeque::from([start.clone()]);
    while let Some(id) = queue.pop_front() {
      if !seen.insert(id.clone()) {
        continue;
      }
      for next in self.downstream(&id) {
        if !seen.contains(next) {
          queue.push_back(next.clone());
        }
      }
    }
    seen
  }

  /// Modules that cannot be reached from `start`, sorted by id.
  pub fn unreachable(&self, start: &ModuleId) -> Vec<ModuleId> {
    let reachable = self.reachable_from(start);
    let mut ids: Vec<ModuleId> = self
      .adjacency
      .keys()
      .filter(|id| !reachable.contains(*id))
      .cloned()
      .collect();
    ids.sort();
    ids
  }
}

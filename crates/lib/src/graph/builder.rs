//! Graph construction and validation.
//!
//! Nodes are stored in insertion order and edges run from dependency to
//! dependent. The finished graph exposes a topological order that is stable
//! for identical input.

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::types::{Expr, LogicalId, Node};
use crate::resource::ResourceKind;

/// Errors raised while building or finishing a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("duplicate logical id: {0}")]
  DuplicateId(LogicalId),

  #[error("unknown node: {0}")]
  UnknownNode(LogicalId),

  #[error("{from} references missing node {to}")]
  DanglingReference { from: LogicalId, to: LogicalId },

  #[error("output {output} references missing node {to}")]
  DanglingOutput { output: String, to: LogicalId },

  #[error("dependency cycle detected at {0}")]
  CycleDetected(LogicalId),
}

/// A named template output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackOutput {
  pub description: String,
  pub value: Expr,
}

/// Accumulates nodes and outputs before validation.
#[derive(Debug, Default)]
pub struct GraphBuilder {
  description: String,
  nodes: Vec<Node>,
  index: HashMap<LogicalId, usize>,
  outputs: BTreeMap<String, StackOutput>,
}

impl GraphBuilder {
  pub fn new(description: &str) -> Self {
    Self {
      description: description.to_string(),
      ..Self::default()
    }
  }

  /// Add a node, returning its id for use in later references.
  pub fn add(&mut self, id: &str, kind: impl Into<ResourceKind>) -> Result<LogicalId, GraphError> {
    let id = LogicalId::from(id);
    if self.index.contains_key(&id) {
      return Err(GraphError::DuplicateId(id));
    }
    let kind = kind.into();
    debug!(id = %id, kind = kind.type_name(), "adding node");
    self.index.insert(id.clone(), self.nodes.len());
    self.nodes.push(Node::new(id.clone(), kind));
    Ok(id)
  }

  pub fn node(&self, id: &LogicalId) -> Option<&Node> {
    self.index.get(id).map(|&i| &self.nodes[i])
  }

  /// Mutable access for post-construction adjustments.
  pub fn node_mut(&mut self, id: &LogicalId) -> Result<&mut Node, GraphError> {
    match self.index.get(id) {
      Some(&i) => Ok(&mut self.nodes[i]),
      None => Err(GraphError::UnknownNode(id.clone())),
    }
  }

  /// Apply `f` to every node added so far.
  pub fn for_each_node(&mut self, mut f: impl FnMut(&mut Node)) {
    for node in &mut self.nodes {
      f(node);
    }
  }

  pub fn add_output(&mut self, name: &str, description: &str, value: Expr) {
    self.outputs.insert(
      name.to_string(),
      StackOutput {
        description: description.to_string(),
        value,
      },
    );
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Validate references and ordering and freeze the graph.
  ///
  /// An imported handle whose name matches a role declared in this graph gets
  /// an ordering edge from that role, and every consumer of the handle gains an
  /// explicit dependency on it. Handles with no local provider stay unordered:
  /// the role must already exist when the definition is applied.
  pub fn finish(mut self) -> Result<StackGraph, GraphError> {
    self.link_imported_roles();

    let mut graph: DiGraph<LogicalId, ()> = DiGraph::new();
    let mut indices: HashMap<LogicalId, NodeIndex> = HashMap::new();
    for node in &self.nodes {
      indices.insert(node.id.clone(), graph.add_node(node.id.clone()));
    }

    for node in &self.nodes {
      let dependent = indices[&node.id];
      let targets = node
        .references()
        .into_iter()
        .map(|r| &r.target)
        .chain(node.depends_on.iter());
      for target in targets {
        let Some(&dependency) = indices.get(target) else {
          return Err(GraphError::DanglingReference {
            from: node.id.clone(),
            to: target.clone(),
          });
        };
        if graph.find_edge(dependency, dependent).is_none() {
          graph.add_edge(dependency, dependent, ());
        }
      }
      if let Some(provider) = self.provider_of(node) {
        let provider = indices[&provider];
        if graph.find_edge(provider, dependent).is_none() {
          graph.add_edge(provider, dependent, ());
        }
      }
    }

    for (name, output) in &self.outputs {
      for r in output.value.references() {
        if !indices.contains_key(&r.target) {
          return Err(GraphError::DanglingOutput {
            output: name.clone(),
            to: r.target.clone(),
          });
        }
      }
    }

    let sorted = toposort(&graph, None).map_err(|cycle| GraphError::CycleDetected(graph[cycle.node_id()].clone()))?;

    let mut edges: Vec<(LogicalId, LogicalId)> = graph
      .edge_indices()
      .filter_map(|e| graph.edge_endpoints(e))
      .map(|(from, to)| (graph[from].clone(), graph[to].clone()))
      .collect();
    edges.sort();

    let mut by_id: HashMap<LogicalId, Node> = self.nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
    let mut nodes = Vec::with_capacity(by_id.len());
    for idx in sorted {
      if let Some(node) = by_id.remove(&graph[idx]) {
        nodes.push(node);
      }
    }
    let index = nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

    debug!(nodes = nodes.len(), edges = edges.len(), "graph finished");

    Ok(StackGraph {
      description: self.description,
      nodes,
      index,
      edges,
      outputs: self.outputs,
    })
  }

  /// Local role node providing an imported handle, if any.
  fn provider_of(&self, node: &Node) -> Option<LogicalId> {
    let ResourceKind::ImportedRole(imported) = &node.kind else {
      return None;
    };
    self
      .nodes
      .iter()
      .find(|n| n.kind.role_name() == Some(imported.role_name.as_str()))
      .map(|n| n.id.clone())
  }

  fn link_imported_roles(&mut self) {
    let providers: HashMap<LogicalId, LogicalId> = self
      .nodes
      .iter()
      .filter_map(|n| self.provider_of(n).map(|p| (n.id.clone(), p)))
      .collect();
    if providers.is_empty() {
      return;
    }
    for node in &mut self.nodes {
      let wanted: Vec<LogicalId> = node
        .references()
        .into_iter()
        .filter_map(|r| providers.get(&r.target).cloned())
        .collect();
      for provider in wanted {
        node.add_dependency(&provider);
      }
    }
  }
}

/// A validated, immutable resource graph.
///
/// Nodes are held in topological order: every node appears after all of the
/// nodes it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackGraph {
  description: String,
  nodes: Vec<Node>,
  #[serde(skip)]
  index: HashMap<LogicalId, usize>,
  edges: Vec<(LogicalId, LogicalId)>,
  outputs: BTreeMap<String, StackOutput>,
}

impl StackGraph {
  pub fn description(&self) -> &str {
    &self.description
  }

  /// Nodes in dependency order.
  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.iter()
  }

  pub fn node(&self, id: &LogicalId) -> Option<&Node> {
    self.index.get(id).map(|&i| &self.nodes[i])
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// All edges as (dependency, dependent), sorted.
  pub fn edges(&self) -> &[(LogicalId, LogicalId)] {
    &self.edges
  }

  /// Direct dependencies of `id`.
  pub fn dependencies_of(&self, id: &LogicalId) -> Vec<&LogicalId> {
    self.edges.iter().filter(|(_, to)| to == id).map(|(from, _)| from).collect()
  }

  pub fn outputs(&self) -> &BTreeMap<String, StackOutput> {
    &self.outputs
  }

  /// Position of `id` in the dependency order.
  pub fn position(&self, id: &LogicalId) -> Option<usize> {
    self.index.get(id).copied()
  }
}

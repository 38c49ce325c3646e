use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::resource::ResourceKind;

/// Stable identifier of a node, used as the template's logical ID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalId(pub String);

impl LogicalId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for LogicalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for LogicalId {
  fn from(id: &str) -> Self {
    LogicalId(id.to_string())
  }
}

/// Attribute of a node a reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefAttr {
  /// The node's primary identifier (`Ref`).
  Ref,
  Arn,
  Name,
  DomainName,
  RegionalDomainName,
  CloneUrlHttp,
  S3CanonicalUserId,
}

impl RefAttr {
  pub fn as_str(&self) -> &'static str {
    match self {
      RefAttr::Ref => "Ref",
      RefAttr::Arn => "Arn",
      RefAttr::Name => "Name",
      RefAttr::DomainName => "DomainName",
      RefAttr::RegionalDomainName => "RegionalDomainName",
      RefAttr::CloneUrlHttp => "CloneUrlHttp",
      RefAttr::S3CanonicalUserId => "S3CanonicalUserId",
    }
  }
}

/// A typed edge from one node to an attribute of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
  pub target: LogicalId,
  pub attr: RefAttr,
}

impl ResourceRef {
  pub fn new(target: &LogicalId, attr: RefAttr) -> Self {
    Self {
      target: target.clone(),
      attr,
    }
  }

  pub fn to(target: &LogicalId) -> Self {
    Self::new(target, RefAttr::Ref)
  }

  pub fn arn(target: &LogicalId) -> Self {
    Self::new(target, RefAttr::Arn)
  }
}

impl fmt::Display for ResourceRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.target, self.attr.as_str())
  }
}

/// A property value that may embed references, resolved at synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
  Literal(String),
  Ref(ResourceRef),
  /// Concatenation of parts.
  Join(Vec<Expr>),
}

impl Expr {
  pub fn literal(value: &str) -> Self {
    Expr::Literal(value.to_string())
  }

  /// Collect every reference embedded in this expression.
  pub fn references(&self) -> Vec<&ResourceRef> {
    match self {
      Expr::Literal(_) => Vec::new(),
      Expr::Ref(r) => vec![r],
      Expr::Join(parts) => parts.iter().flat_map(Expr::references).collect(),
    }
  }
}

impl From<ResourceRef> for Expr {
  fn from(r: ResourceRef) -> Self {
    Expr::Ref(r)
  }
}

/// What the provisioning engine does with a resource when it leaves the definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
  #[default]
  Destroy,
  Retain,
}

impl RemovalPolicy {
  /// Template policy keyword, `None` when the engine default applies.
  pub fn as_policy(&self) -> Option<&'static str> {
    match self {
      RemovalPolicy::Destroy => None,
      RemovalPolicy::Retain => Some("Retain"),
    }
  }
}

/// A key/value tag pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tag {
  pub key: String,
  pub value: String,
}

impl Tag {
  pub fn new(key: &str, value: &str) -> Self {
    Self {
      key: key.to_string(),
      value: value.to_string(),
    }
  }

  /// Template form: `{"Key": .., "Value": ..}`.
  pub fn to_value(&self) -> Value {
    json!({ "Key": self.key, "Value": self.value })
  }
}

impl Default for Tag {
  fn default() -> Self {
    Tag::new("project", "my-web")
  }
}

/// A node of the resource graph.
///
/// The record in `kind` is fixed at construction; everything else is a
/// post-construction adjustment applied before the graph is finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
  pub id: LogicalId,
  pub kind: ResourceKind,
  pub removal_policy: RemovalPolicy,
  /// Tags carried through the record's own tagging parameter.
  pub tags: Vec<Tag>,
  /// Raw property overrides as (dotted path, value), applied in order.
  pub overrides: Vec<(String, Value)>,
  /// Explicit ordering dependencies.
  pub depends_on: Vec<LogicalId>,
}

impl Node {
  pub fn new(id: LogicalId, kind: ResourceKind) -> Self {
    Self {
      id,
      kind,
      removal_policy: RemovalPolicy::default(),
      tags: Vec::new(),
      overrides: Vec::new(),
      depends_on: Vec::new(),
    }
  }

  pub fn apply_removal_policy(&mut self, policy: RemovalPolicy) -> &mut Self {
    self.removal_policy = policy;
    self
  }

  /// Set a raw template property, bypassing the typed record.
  ///
  /// `path` is dot-separated; intermediate objects are created as needed and
  /// a later override of the same path replaces the earlier one.
  pub fn add_property_override(&mut self, path: &str, value: Value) -> &mut Self {
    self.overrides.push((path.to_string(), value));
    self
  }

  /// Last override set for exactly `path`, if any.
  pub fn property_override(&self, path: &str) -> Option<&Value> {
    self.overrides.iter().rev().find(|(p, _)| p == path).map(|(_, v)| v)
  }

  pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
    if !self.tags.contains(&tag) {
      self.tags.push(tag);
    }
    self
  }

  pub fn add_dependency(&mut self, id: &LogicalId) -> &mut Self {
    if !self.depends_on.contains(id) {
      self.depends_on.push(id.clone());
    }
    self
  }

  /// Every reference held by the record.
  pub fn references(&self) -> Vec<&ResourceRef> {
    self.kind.references()
  }
}

/// Set `value` at a dotted `path` inside `target`, creating objects on the way.
pub fn set_path(target: &mut Value, path: &str, value: Value) {
  let mut current = target;
  let mut segments = path.split('.').peekable();
  while let Some(segment) = segments.next() {
    if !current.is_object() {
      *current = Value::Object(serde_json::Map::new());
    }
    let Value::Object(map) = current else {
      return;
    };
    if segments.peek().is_none() {
      map.insert(segment.to_string(), value);
      return;
    }
    current = map.entry(segment.to_string()).or_insert_with(|| Value::Object(serde_json::Map::new()));
  }
}

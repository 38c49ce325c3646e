//! Template synthesis.
//!
//! Turns a finished [`StackGraph`] into a CloudFormation template. The
//! template is a pure function of the graph: resources are keyed by logical
//! ID in a sorted map, so identical graphs render byte-identical output.

mod resolve;

pub use resolve::Resolver;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::TEMPLATE_FORMAT_VERSION;
use crate::graph::{StackGraph, set_path};
use crate::util::hash::Hashable;

/// Errors that can occur while rendering a template.
#[derive(Debug, Error)]
pub enum SynthError {
  #[error("failed to encode template as JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("failed to encode template as YAML: {0}")]
  Yaml(#[from] serde_yaml::Error),
}

/// Output encoding of a rendered template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateFormat {
  #[default]
  Json,
  Yaml,
}

impl TemplateFormat {
  pub fn extension(&self) -> &'static str {
    match self {
      TemplateFormat::Json => "json",
      TemplateFormat::Yaml => "yaml",
    }
  }
}

/// One resource entry of the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateResource {
  #[serde(rename = "Type")]
  pub resource_type: String,
  pub properties: Value,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deletion_policy: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub update_replace_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateOutput {
  pub description: String,
  pub value: Value,
}

/// A complete CloudFormation template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
  #[serde(rename = "AWSTemplateFormatVersion")]
  pub format_version: String,
  #[serde(rename = "Description")]
  pub description: String,
  #[serde(rename = "Resources")]
  pub resources: BTreeMap<String, TemplateResource>,
  #[serde(rename = "Outputs", default, skip_serializing_if = "BTreeMap::is_empty")]
  pub outputs: BTreeMap<String, TemplateOutput>,
}

impl Hashable for Template {}

impl Template {
  pub fn render(&self, format: TemplateFormat) -> Result<String, SynthError> {
    Ok(match format {
      TemplateFormat::Json => serde_json::to_string_pretty(self)?,
      TemplateFormat::Yaml => serde_yaml::to_string(self)?,
    })
  }

  pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
    self.resources.get(id)
  }
}

/// Synthesize the template for a finished graph.
///
/// Per node: the record's properties, then tags carried by the record, then
/// raw property overrides in the order they were added. External handles are
/// not emitted.
pub fn synthesize(graph: &StackGraph) -> Template {
  let resolver = Resolver::new(graph);
  let mut resources = BTreeMap::new();

  for node in graph.nodes() {
    if node.kind.is_external() {
      debug!(id = %node.id, "skipping external handle");
      continue;
    }

    let mut properties = node.kind.properties(&resolver);
    if !node.tags.is_empty() {
      properties["Tags"] = Value::Array(node.tags.iter().map(|t| t.to_value()).collect());
    }
    for (path, value) in &node.overrides {
      set_path(&mut properties, path, value.clone());
    }

    let policy = node.removal_policy.as_policy().map(str::to_string);
    resources.insert(
      node.id.to_string(),
      TemplateResource {
        resource_type: node.kind.type_name().to_string(),
        properties,
        depends_on: node.depends_on.iter().map(|d| d.to_string()).collect(),
        deletion_policy: policy.clone(),
        update_replace_policy: policy,
      },
    );
  }

  let outputs = graph
    .outputs()
    .iter()
    .map(|(name, output)| {
      (
        name.clone(),
        TemplateOutput {
          description: output.description.clone(),
          value: resolver.expr(&output.value),
        },
      )
    })
    .collect();

  info!(resources = resources.len(), "synthesized template");

  Template {
    format_version: TEMPLATE_FORMAT_VERSION.to_string(),
    description: graph.description().to_string(),
    resources,
    outputs,
  }
}

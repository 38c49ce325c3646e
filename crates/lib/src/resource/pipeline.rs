use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::graph::{Expr, ResourceRef};
use crate::synth::Resolver;

/// A named artifact handed from one pipeline action to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artifact(pub String);

impl Artifact {
  pub fn named(name: &str) -> Self {
    Artifact(name.to_string())
  }
}

/// Pulls a repository branch and publishes it as an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAction {
  pub name: String,
  /// Repository name attribute.
  pub repository: ResourceRef,
  pub branch: String,
  pub output: Artifact,
}

/// Runs a build project over an input artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildAction {
  pub name: String,
  pub project: ResourceRef,
  pub input: Artifact,
  pub environment: BTreeMap<String, Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
  Source(SourceAction),
  Build(BuildAction),
}

impl Action {
  pub fn name(&self) -> &str {
    match self {
      Action::Source(a) => &a.name,
      Action::Build(a) => &a.name,
    }
  }

  pub fn inputs(&self) -> Vec<&Artifact> {
    match self {
      Action::Source(_) => Vec::new(),
      Action::Build(a) => vec![&a.input],
    }
  }

  pub fn outputs(&self) -> Vec<&Artifact> {
    match self {
      Action::Source(a) => vec![&a.output],
      Action::Build(_) => Vec::new(),
    }
  }

  pub fn references(&self) -> Vec<&ResourceRef> {
    match self {
      Action::Source(a) => vec![&a.repository],
      Action::Build(a) => {
        let mut refs = vec![&a.project];
        refs.extend(a.environment.values().flat_map(Expr::references));
        refs
      }
    }
  }

  fn render(&self, resolver: &Resolver<'_>) -> Value {
    match self {
      Action::Source(a) => json!({
        "Name": a.name,
        "ActionTypeId": { "Category": "Source", "Owner": "AWS", "Provider": "CodeCommit", "Version": "1" },
        "Configuration": {
          "RepositoryName": resolver.reference(&a.repository),
          "BranchName": a.branch,
          "PollForSourceChanges": true,
        },
        "OutputArtifacts": [{ "Name": a.output.0 }],
        "RunOrder": 1,
      }),
      Action::Build(a) => {
        let mut configuration = json!({ "ProjectName": resolver.reference(&a.project) });
        if !a.environment.is_empty() {
          configuration["EnvironmentVariables"] = resolver.expr(&environment_variables(&a.environment));
        }
        json!({
          "Name": a.name,
          "ActionTypeId": { "Category": "Build", "Owner": "AWS", "Provider": "CodeBuild", "Version": "1" },
          "Configuration": configuration,
          "InputArtifacts": [{ "Name": a.input.0 }],
          "RunOrder": 1,
        })
      }
    }
  }
}

/// Encode plaintext build variables as the JSON string the build action expects.
///
/// Literal text is JSON-escaped; references are spliced in as-is and the
/// engine joins the parts at apply time.
pub fn environment_variables(vars: &BTreeMap<String, Expr>) -> Expr {
  let mut parts = vec![Expr::literal("[")];
  for (i, (name, value)) in vars.iter().enumerate() {
    let separator = if i == 0 { "" } else { "," };
    parts.push(Expr::Literal(format!(
      "{}{{\"name\":{},\"type\":\"PLAINTEXT\",\"value\":\"",
      separator,
      json!(name)
    )));
    parts.push(escape_literals(value));
    parts.push(Expr::literal("\"}"));
  }
  parts.push(Expr::literal("]"));
  Expr::Join(parts)
}

fn escape_literals(expr: &Expr) -> Expr {
  match expr {
    Expr::Literal(s) => {
      let quoted = json!(s).to_string();
      Expr::Literal(quoted[1..quoted.len() - 1].to_string())
    }
    Expr::Ref(r) => Expr::Ref(r.clone()),
    Expr::Join(parts) => Expr::Join(parts.iter().map(escape_literals).collect()),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
  pub name: String,
  pub actions: Vec<Action>,
}

/// An ordered sequence of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
  pub name: String,
  pub role: ResourceRef,
  pub artifact_bucket: ResourceRef,
  pub stages: Vec<Stage>,
}

impl Pipeline {
  pub fn stage(&self, name: &str) -> Option<&Stage> {
    self.stages.iter().find(|s| s.name == name)
  }

  pub fn references(&self) -> Vec<&ResourceRef> {
    let mut refs = vec![&self.role, &self.artifact_bucket];
    refs.extend(
      self
        .stages
        .iter()
        .flat_map(|s| s.actions.iter())
        .flat_map(Action::references),
    );
    refs
  }

  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    let stages: Vec<Value> = self
      .stages
      .iter()
      .map(|stage| {
        json!({
          "Name": stage.name,
          "Actions": stage.actions.iter().map(|a| a.render(resolver)).collect::<Vec<_>>(),
        })
      })
      .collect();

    json!({
      "Name": self.name,
      "RoleArn": resolver.reference(&self.role),
      "ArtifactStore": { "Type": "S3", "Location": resolver.reference(&self.artifact_bucket) },
      "Stages": stages,
    })
  }
}

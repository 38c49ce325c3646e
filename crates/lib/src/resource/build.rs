use serde::Serialize;
use serde_json::{Value, json};

use crate::buildspec::BuildSpec;
use crate::graph::ResourceRef;
use crate::synth::Resolver;

/// Repository branch a build project checks out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCommitSource {
  pub repository: ResourceRef,
  pub branch: String,
}

/// A build project bound to a role and a repository branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildProject {
  pub name: String,
  pub buildspec: BuildSpec,
  /// Service role; for the stack build this is the imported by-name handle.
  pub role: ResourceRef,
  pub image: String,
  pub compute_type: String,
  pub source: CodeCommitSource,
}

impl BuildProject {
  pub fn references(&self) -> Vec<&ResourceRef> {
    vec![&self.role, &self.source.repository]
  }

  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    json!({
      "Name": self.name,
      "ServiceRole": resolver.reference(&self.role),
      "Source": {
        "Type": "CODECOMMIT",
        "Location": resolver.reference(&self.source.repository),
        "BuildSpec": self.buildspec.rendered(),
      },
      "SourceVersion": self.source.branch,
      "Artifacts": { "Type": "NO_ARTIFACTS" },
      "Environment": {
        "Type": "LINUX_CONTAINER",
        "Image": self.image,
        "ComputeType": self.compute_type,
        "PrivilegedMode": false,
        "ImagePullCredentialsType": "CODEBUILD",
      },
    })
  }
}

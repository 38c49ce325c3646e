use serde::Serialize;
use serde_json::{Value, json};

use super::iam::PolicyStatement;
use crate::consts::POLICY_VERSION;
use crate::graph::ResourceRef;
use crate::synth::Resolver;

/// An object storage bucket with a fixed, globally unique name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
  pub name: String,
}

impl Bucket {
  pub fn properties(&self) -> Value {
    json!({ "BucketName": self.name })
  }
}

/// Resource policy attached to a bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPolicy {
  pub bucket: ResourceRef,
  pub statements: Vec<PolicyStatement>,
}

impl BucketPolicy {
  pub fn references(&self) -> Vec<&ResourceRef> {
    let mut refs = vec![&self.bucket];
    refs.extend(self.statements.iter().flat_map(PolicyStatement::references));
    refs
  }

  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    json!({
      "Bucket": resolver.reference(&self.bucket),
      "PolicyDocument": {
        "Version": POLICY_VERSION,
        "Statement": self.statements.iter().map(|s| s.render(resolver)).collect::<Vec<_>>(),
      },
    })
  }
}

//! Typed resource records.
//!
//! Each record is plain configuration: it knows its template type, which
//! other nodes it references, and how to render its properties once those
//! references can be resolved. Records never validate provider semantics;
//! that is left to the provisioning engine.

mod build;
mod cdn;
mod iam;
mod pipeline;
mod repository;
mod storage;

pub use build::*;
pub use cdn::*;
pub use iam::*;
pub use pipeline::*;
pub use repository::*;
pub use storage::*;

use serde::Serialize;
use serde_json::Value;

use crate::graph::ResourceRef;
use crate::synth::Resolver;

/// Every kind of node the graph can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResourceKind {
  SourceRepository(SourceRepository),
  Bucket(Bucket),
  BucketPolicy(BucketPolicy),
  CachePolicy(CachePolicy),
  OriginAccessIdentity(OriginAccessIdentity),
  Distribution(Distribution),
  Role(Role),
  /// By-name handle to a role owned elsewhere; never emitted as a resource.
  ImportedRole(ImportedRole),
  BuildProject(BuildProject),
  Pipeline(Pipeline),
}

impl ResourceKind {
  /// Template resource type.
  pub fn type_name(&self) -> &'static str {
    match self {
      ResourceKind::SourceRepository(_) => "AWS::CodeCommit::Repository",
      ResourceKind::Bucket(_) => "AWS::S3::Bucket",
      ResourceKind::BucketPolicy(_) => "AWS::S3::BucketPolicy",
      ResourceKind::CachePolicy(_) => "AWS::CloudFront::CachePolicy",
      ResourceKind::OriginAccessIdentity(_) => "AWS::CloudFront::CloudFrontOriginAccessIdentity",
      ResourceKind::Distribution(_) => "AWS::CloudFront::Distribution",
      ResourceKind::Role(_) | ResourceKind::ImportedRole(_) => "AWS::IAM::Role",
      ResourceKind::BuildProject(_) => "AWS::CodeBuild::Project",
      ResourceKind::Pipeline(_) => "AWS::CodePipeline::Pipeline",
    }
  }

  /// Whether the node is only a handle to something managed elsewhere.
  pub fn is_external(&self) -> bool {
    matches!(self, ResourceKind::ImportedRole(_))
  }

  /// Whether the record exposes a tagging parameter of its own.
  ///
  /// Repositories and pipelines do not; they are tagged through a raw
  /// `Tags` property override instead.
  pub fn supports_tags(&self) -> bool {
    matches!(
      self,
      ResourceKind::Bucket(_) | ResourceKind::Distribution(_) | ResourceKind::Role(_) | ResourceKind::BuildProject(_)
    )
  }

  /// Name of the role this node declares or imports.
  pub fn role_name(&self) -> Option<&str> {
    match self {
      ResourceKind::Role(role) => Some(&role.name),
      _ => None,
    }
  }

  pub fn references(&self) -> Vec<&ResourceRef> {
    match self {
      ResourceKind::SourceRepository(_)
      | ResourceKind::Bucket(_)
      | ResourceKind::CachePolicy(_)
      | ResourceKind::OriginAccessIdentity(_)
      | ResourceKind::ImportedRole(_) => Vec::new(),
      ResourceKind::BucketPolicy(policy) => policy.references(),
      ResourceKind::Distribution(distribution) => distribution.references(),
      ResourceKind::Role(role) => role.references(),
      ResourceKind::BuildProject(project) => project.references(),
      ResourceKind::Pipeline(pipeline) => pipeline.references(),
    }
  }

  /// Render the record's own properties, before tags and overrides.
  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    match self {
      ResourceKind::SourceRepository(repo) => repo.properties(),
      ResourceKind::Bucket(bucket) => bucket.properties(),
      ResourceKind::BucketPolicy(policy) => policy.properties(resolver),
      ResourceKind::CachePolicy(policy) => policy.properties(),
      ResourceKind::OriginAccessIdentity(oai) => oai.properties(),
      ResourceKind::Distribution(distribution) => distribution.properties(resolver),
      ResourceKind::Role(role) => role.properties(resolver),
      ResourceKind::ImportedRole(_) => Value::Null,
      ResourceKind::BuildProject(project) => project.properties(resolver),
      ResourceKind::Pipeline(pipeline) => pipeline.properties(resolver),
    }
  }
}

macro_rules! impl_from_record {
  ($($variant:ident),* $(,)?) => {
    $(
      impl From<$variant> for ResourceKind {
        fn from(record: $variant) -> Self {
          ResourceKind::$variant(record)
        }
      }
    )*
  };
}

impl_from_record!(
  SourceRepository,
  Bucket,
  BucketPolicy,
  CachePolicy,
  OriginAccessIdentity,
  Distribution,
  Role,
  ImportedRole,
  BuildProject,
  Pipeline,
);

//! Static web stack assembly.
//!
//! One parametrized template builds the whole topology: a repository, the
//! site bucket behind a CDN distribution, the build role and project, and a
//! Commit -> Build delivery pipeline. [`StackOptions`] carries everything that
//! varies between environments.
//!
//! Assembly is fail-fast on the build-step document: it is loaded before any
//! node exists, so a missing or malformed file never yields a partial graph.
//! Everything else (name collisions, permission problems, a missing shared
//! role) surfaces in the provisioning engine, not here.

pub mod ids;

use std::collections::BTreeMap;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::buildspec::{BuildSpec, BuildSpecError};
use crate::config::StackOptions;
use crate::consts::CORS_S3_ORIGIN_REQUEST_POLICY_ID;
use crate::graph::{Expr, GraphBuilder, GraphError, LogicalId, RefAttr, RemovalPolicy, ResourceRef, StackGraph, Tag};
use crate::resource::{
  Action, AllowedMethods, Artifact, Bucket, BucketPolicy, BuildAction, BuildProject, CachePolicy, CodeCommitSource,
  Distribution, ImportedRole, OriginAccessIdentity, PIPELINE_SERVICE_PRINCIPAL, Pipeline, PolicyStatement, Principal,
  Role, S3Origin, SourceAction, SourceRepository, Stage, ViewerProtocolPolicy,
};

/// Errors that can occur while assembling the stack.
#[derive(Debug, Error)]
pub enum AssembleError {
  #[error(transparent)]
  BuildSpec(#[from] BuildSpecError),

  #[error("invalid resource graph: {0}")]
  Graph(#[from] GraphError),
}

/// Load the build-step document named by `options`, then assemble.
pub fn assemble(options: &StackOptions) -> Result<StackGraph, AssembleError> {
  let buildspec = BuildSpec::load(&options.buildspec_path())?;
  assemble_with(options, buildspec)
}

/// Assemble the stack around an already loaded build-step document.
pub fn assemble_with(options: &StackOptions, buildspec: BuildSpec) -> Result<StackGraph, AssembleError> {
  info!(stack = %options.stack_name, suffix = ?options.suffix, "assembling stack");
  let mut builder = GraphBuilder::new(&options.description);

  let repository = add_repository(&mut builder, options)?;
  let store = builder.add(
    ids::ARTIFACT_STORE,
    Bucket {
      name: options.physical_name(&options.bucket.name),
    },
  )?;
  let distribution = add_distribution(&mut builder, options, &store)?;
  let imported_role = add_execution_role(&mut builder, options)?;
  let project = builder.add(
    ids::BUILD_PROJECT,
    BuildProject {
      name: options.physical_name(&options.build.project_name),
      buildspec,
      role: ResourceRef::arn(&imported_role),
      image: options.build.image.clone(),
      compute_type: options.build.compute_type.clone(),
      source: CodeCommitSource {
        repository: ResourceRef::new(&repository, RefAttr::CloneUrlHttp),
        branch: options.branch.clone(),
      },
    },
  )?;
  let pipeline = add_pipeline(&mut builder, options, &repository, &project, &store)?;

  builder.for_each_node(|node| {
    node.apply_removal_policy(RemovalPolicy::Retain);
  });
  for id in ids::TOP_LEVEL {
    tag_resource(&mut builder, &LogicalId::from(id), &options.tag)?;
  }

  builder.add_output(
    "DistributionDomainName",
    "Domain name serving the site",
    Expr::Ref(ResourceRef::new(&distribution, RefAttr::DomainName)),
  );
  builder.add_output(
    "RepositoryCloneUrl",
    "HTTPS clone URL of the source repository",
    Expr::Ref(ResourceRef::new(&repository, RefAttr::CloneUrlHttp)),
  );

  let graph = builder.finish()?;
  info!(nodes = graph.len(), pipeline = %pipeline, "stack assembled");
  Ok(graph)
}

fn add_repository(builder: &mut GraphBuilder, options: &StackOptions) -> Result<LogicalId, GraphError> {
  let id = builder.add(
    ids::SOURCE_REPOSITORY,
    SourceRepository {
      name: options.physical_name(&options.repository.name),
      description: options.repository.description.clone(),
    },
  )?;
  if let Some(seed) = &options.repository.seed {
    debug!(bucket = %seed.bucket, key = %seed.key, branch = %seed.branch, "seeding repository from archive");
    builder
      .node_mut(&id)?
      .add_property_override("Code", seed.to_code_property());
  }
  Ok(id)
}

/// Cache policy and access identity first; the distribution needs both.
fn add_distribution(
  builder: &mut GraphBuilder,
  options: &StackOptions,
  store: &LogicalId,
) -> Result<LogicalId, GraphError> {
  let cdn = &options.cdn;
  let cache_policy = builder.add(
    ids::CACHE_POLICY,
    CachePolicy {
      name: options.physical_name(&cdn.cache_policy_name),
      comment: cdn.cache_comment.clone(),
      default_ttl: cdn.default_ttl,
      min_ttl: cdn.min_ttl,
      max_ttl: cdn.max_ttl,
    },
  )?;
  let identity = builder.add(
    ids::ORIGIN_ACCESS_IDENTITY,
    OriginAccessIdentity {
      comment: cdn.oai_comment.clone(),
    },
  )?;
  builder.add(
    ids::ARTIFACT_STORE_POLICY,
    BucketPolicy {
      bucket: ResourceRef::to(store),
      statements: vec![
        PolicyStatement::allow(
          &["s3:GetObject"],
          vec![Expr::Join(vec![Expr::Ref(ResourceRef::arn(store)), Expr::literal("/*")])],
        )
        .with_principal(Principal::CanonicalUser(Expr::Ref(ResourceRef::new(
          &identity,
          RefAttr::S3CanonicalUserId,
        )))),
      ],
    },
  )?;

  builder.add(
    ids::DISTRIBUTION,
    Distribution {
      origin: S3Origin {
        id: ids::ORIGIN_ID.to_string(),
        bucket: ResourceRef::new(store, RefAttr::RegionalDomainName),
        identity: ResourceRef::to(&identity),
      },
      allowed_methods: AllowedMethods::GetHeadOptions,
      viewer_protocol_policy: ViewerProtocolPolicy::HttpsOnly,
      cache_policy: ResourceRef::to(&cache_policy),
      origin_request_policy_id: Some(CORS_S3_ORIGIN_REQUEST_POLICY_ID.to_string()),
      default_root_object: cdn.default_root_object.clone(),
    },
  )
}

/// Declare the shared build role, then return a by-name handle to it.
///
/// Consumers bind to the handle rather than the declaration, so a definition
/// that does not own the role can reuse it unchanged.
fn add_execution_role(builder: &mut GraphBuilder, options: &StackOptions) -> Result<LogicalId, GraphError> {
  builder.add(
    ids::EXECUTION_ROLE,
    Role::build_role(&options.role.name, &options.role.description),
  )?;
  builder.add(ids::IMPORTED_ROLE, ImportedRole::by_name(&options.role.name))
}

fn add_pipeline(
  builder: &mut GraphBuilder,
  options: &StackOptions,
  repository: &LogicalId,
  project: &LogicalId,
  store: &LogicalId,
) -> Result<LogicalId, GraphError> {
  let artifacts = builder.add(
    ids::PIPELINE_ARTIFACTS,
    Bucket {
      name: format!("{}-artifacts", options.physical_name(&options.pipeline.name)),
    },
  )?;
  let role = builder.add(
    ids::PIPELINE_ROLE,
    pipeline_role(options, repository, project, &artifacts),
  )?;

  let source_output = Artifact::named(ids::SOURCE_ARTIFACT);
  let bucket_address = Expr::Join(vec![Expr::literal("s3://"), Expr::Ref(ResourceRef::to(store))]);

  builder.add(
    ids::PIPELINE,
    Pipeline {
      name: options.physical_name(&options.pipeline.name),
      role: ResourceRef::arn(&role),
      artifact_bucket: ResourceRef::to(&artifacts),
      stages: vec![
        Stage {
          name: ids::COMMIT_STAGE.to_string(),
          actions: vec![Action::Source(SourceAction {
            name: ids::SOURCE_ACTION.to_string(),
            repository: ResourceRef::new(repository, RefAttr::Name),
            branch: options.branch.clone(),
            output: source_output.clone(),
          })],
        },
        Stage {
          name: ids::BUILD_STAGE.to_string(),
          actions: vec![Action::Build(BuildAction {
            name: ids::BUILD_ACTION.to_string(),
            project: ResourceRef::to(project),
            input: source_output,
            environment: BTreeMap::from([(options.pipeline.bucket_variable.clone(), bucket_address)]),
          })],
        },
      ],
    },
  )
}

fn pipeline_role(options: &StackOptions, repository: &LogicalId, project: &LogicalId, artifacts: &LogicalId) -> Role {
  let statements = vec![
    PolicyStatement::allow(
      &[
        "codecommit:GetBranch",
        "codecommit:GetCommit",
        "codecommit:UploadArchive",
        "codecommit:GetUploadArchiveStatus",
        "codecommit:CancelUploadArchive",
      ],
      vec![Expr::Ref(ResourceRef::arn(repository))],
    ),
    PolicyStatement::allow(
      &["codebuild:BatchGetBuilds", "codebuild:StartBuild", "codebuild:StopBuild"],
      vec![Expr::Ref(ResourceRef::arn(project))],
    ),
    PolicyStatement::allow(
      &[
        "s3:GetObject*",
        "s3:GetBucket*",
        "s3:List*",
        "s3:PutObject",
        "s3:DeleteObject*",
        "s3:Abort*",
      ],
      vec![
        Expr::Ref(ResourceRef::arn(artifacts)),
        Expr::Join(vec![Expr::Ref(ResourceRef::arn(artifacts)), Expr::literal("/*")]),
      ],
    ),
  ];

  Role {
    name: options.physical_name(&format!("{}-role", options.pipeline.name)),
    description: format!("delivery pipeline role for {}", options.physical_name(&options.pipeline.name)),
    assumed_by: PIPELINE_SERVICE_PRINCIPAL.to_string(),
    inline_policies: BTreeMap::from([("pipelineAccess".to_string(), statements)]),
  }
}

/// Tag through the record when it can carry tags, otherwise through a `Tags` override.
fn tag_resource(builder: &mut GraphBuilder, id: &LogicalId, tag: &Tag) -> Result<(), GraphError> {
  let node = builder.node_mut(id)?;
  if node.kind.supports_tags() {
    node.add_tag(tag.clone());
  } else {
    node.add_property_override("Tags", json!([tag.to_value()]));
  }
  Ok(())
}

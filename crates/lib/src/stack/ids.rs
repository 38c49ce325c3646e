//! Logical IDs of the stack's nodes.

pub const SOURCE_REPOSITORY: &str = "SourceRepository";
pub const ARTIFACT_STORE: &str = "ArtifactStore";
pub const ARTIFACT_STORE_POLICY: &str = "ArtifactStorePolicy";
pub const CACHE_POLICY: &str = "CachePolicy";
pub const ORIGIN_ACCESS_IDENTITY: &str = "OriginAccessIdentity";
pub const DISTRIBUTION: &str = "DistributionFront";
pub const EXECUTION_ROLE: &str = "ExecutionRole";
pub const IMPORTED_ROLE: &str = "ImportedRole";
pub const BUILD_PROJECT: &str = "BuildDefinition";
pub const PIPELINE_ARTIFACTS: &str = "PipelineArtifactsBucket";
pub const PIPELINE_ROLE: &str = "PipelineRole";
pub const PIPELINE: &str = "DeliveryPipeline";

/// Nodes carrying the project tag.
pub const TOP_LEVEL: [&str; 8] = [
  SOURCE_REPOSITORY,
  ARTIFACT_STORE,
  DISTRIBUTION,
  EXECUTION_ROLE,
  BUILD_PROJECT,
  PIPELINE_ARTIFACTS,
  PIPELINE_ROLE,
  PIPELINE,
];

pub const COMMIT_STAGE: &str = "Commit";
pub const BUILD_STAGE: &str = "Build";
pub const SOURCE_ACTION: &str = "commitMe";
pub const BUILD_ACTION: &str = "BuildMe";
pub const SOURCE_ARTIFACT: &str = "Artifact_Commit_commitMe";
pub const ORIGIN_ID: &str = "ArtifactStoreOrigin";

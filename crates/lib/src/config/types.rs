use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::consts::DEFAULT_BUILDSPEC_FILE;
use crate::graph::Tag;

/// Options record driving the stack template.
///
/// Every field defaults to the values of the reference deployment, so an
/// empty options file assembles the same graph as no options file at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackOptions {
  /// Template name, used for the synthesized file name.
  pub stack_name: String,
  /// Template description.
  pub description: String,
  /// Environment suffix appended to per-environment physical names.
  pub suffix: Option<String>,
  /// Project identity tag applied to every top-level resource.
  pub tag: Tag,
  /// Branch the repository, build and pipeline track.
  pub branch: String,
  /// Build-step document path, relative to [`StackOptions::base_dir`].
  pub buildspec: PathBuf,
  pub repository: RepositoryOptions,
  pub bucket: BucketOptions,
  pub cdn: CdnOptions,
  pub role: RoleOptions,
  pub build: BuildOptions,
  pub pipeline: PipelineOptions,
  /// Directory relative paths are resolved against.
  #[serde(skip)]
  pub base_dir: PathBuf,
}

impl Default for StackOptions {
  fn default() -> Self {
    Self {
      stack_name: "MyWebProjectStack".to_string(),
      description: "Static web hosting with a commit-to-build delivery pipeline".to_string(),
      suffix: None,
      tag: Tag::default(),
      branch: "main".to_string(),
      buildspec: PathBuf::from(DEFAULT_BUILDSPEC_FILE),
      repository: RepositoryOptions::default(),
      bucket: BucketOptions::default(),
      cdn: CdnOptions::default(),
      role: RoleOptions::default(),
      build: BuildOptions::default(),
      pipeline: PipelineOptions::default(),
      base_dir: PathBuf::from("."),
    }
  }
}

impl StackOptions {
  pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.base_dir = dir.as_ref().to_path_buf();
    self
  }

  /// Absolute (or base-relative) location of the build-step document.
  pub fn buildspec_path(&self) -> PathBuf {
    if self.buildspec.is_absolute() {
      self.buildspec.clone()
    } else {
      self.base_dir.join(&self.buildspec)
    }
  }

  /// Apply the environment suffix to a per-environment physical name.
  pub fn physical_name(&self, base: &str) -> String {
    match self.suffix.as_deref() {
      Some(suffix) if !suffix.is_empty() => format!("{}-{}", base, suffix),
      _ => base.to_string(),
    }
  }
}

/// Location of a zip archive that seeds the repository's first commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedArchive {
  pub bucket: String,
  pub key: String,
  pub branch: String,
}

impl Default for SeedArchive {
  fn default() -> Self {
    Self {
      bucket: "my-stuffs".to_string(),
      key: "codeCDK/web/Archive.zip".to_string(),
      branch: "main".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryOptions {
  pub name: String,
  pub description: String,
  /// `seed = false` starts the repository empty; `seed = true` keeps the default archive.
  #[serde(deserialize_with = "seed_from_setting")]
  pub seed: Option<SeedArchive>,
}

impl Default for RepositoryOptions {
  fn default() -> Self {
    Self {
      name: "my-web-repo-test".to_string(),
      description: "this is my first web".to_string(),
      seed: Some(SeedArchive::default()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketOptions {
  pub name: String,
}

impl Default for BucketOptions {
  fn default() -> Self {
    Self {
      name: "my-web-test-1".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnOptions {
  pub cache_policy_name: String,
  pub cache_comment: String,
  #[serde(deserialize_with = "duration_from_str")]
  pub default_ttl: Duration,
  #[serde(deserialize_with = "duration_from_str")]
  pub min_ttl: Duration,
  #[serde(deserialize_with = "duration_from_str")]
  pub max_ttl: Duration,
  pub oai_comment: String,
  pub default_root_object: String,
}

impl Default for CdnOptions {
  fn default() -> Self {
    Self {
      cache_policy_name: "myWebPolicy".to_string(),
      cache_comment: "My policy".to_string(),
      default_ttl: Duration::from_secs(2 * 24 * 60 * 60),
      min_ttl: Duration::from_secs(60),
      max_ttl: Duration::from_secs(10 * 24 * 60 * 60),
      oai_comment: "this is a test".to_string(),
      default_root_object: "index.html".to_string(),
    }
  }
}

/// The build role is shared across definitions, so its name never takes the suffix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleOptions {
  pub name: String,
  pub description: String,
}

impl Default for RoleOptions {
  fn default() -> Self {
    Self {
      name: "codebuildRole".to_string(),
      description: "role for building cool stuffs".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
  pub project_name: String,
  pub image: String,
  pub compute_type: String,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      project_name: "web-build".to_string(),
      image: "aws/codebuild/standard:5.0".to_string(),
      compute_type: "BUILD_GENERAL1_SMALL".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
  pub name: String,
  /// Build-stage variable carrying the artifact store address.
  pub bucket_variable: String,
}

impl Default for PipelineOptions {
  fn default() -> Self {
    Self {
      name: "my-web-pipelines".to_string(),
      bucket_variable: "S3BUCKET".to_string(),
    }
  }
}

/// Seed setting as written in the options file: a switch or an archive table.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedSetting {
  Enabled(bool),
  Archive(SeedArchive),
}

fn seed_from_setting<'de, D>(deserializer: D) -> Result<Option<SeedArchive>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match SeedSetting::deserialize(deserializer)? {
    SeedSetting::Enabled(true) => Some(SeedArchive::default()),
    SeedSetting::Enabled(false) => None,
    SeedSetting::Archive(archive) => Some(archive),
  })
}

fn duration_from_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  humantime::parse_duration(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{}': {}", raw, e)))
}

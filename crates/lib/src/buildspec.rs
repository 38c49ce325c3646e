//! Build-step document loading.
//!
//! The document is opaque to this crate: it is read, parsed into a generic
//! YAML value, and re-encoded into the YAML string the build platform expects.
//! Only syntactic validity is required here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::util::hash::{ContentHash, hash_bytes};

/// Errors that can occur while loading a build-step document.
#[derive(Debug, Error)]
pub enum BuildSpecError {
  #[error("failed to read build-step document {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse build-step document {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_yaml::Error },

  #[error("failed to encode build-step document {}: {source}", path.display())]
  Encode { path: PathBuf, source: serde_yaml::Error },
}

/// A loaded build-step document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSpec {
  source: PathBuf,
  hash: ContentHash,
  document: serde_yaml::Value,
  rendered: String,
}

impl BuildSpec {
  /// Read and parse the document at `path`.
  pub fn load(path: &Path) -> Result<Self, BuildSpecError> {
    let raw = fs::read(path).map_err(|source| BuildSpecError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let document: serde_yaml::Value = serde_yaml::from_slice(&raw).map_err(|source| BuildSpecError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    let spec = Self::from_document(path, hash_bytes(&raw), document)?;
    info!(path = %path.display(), hash = %spec.hash, "loaded build-step document");
    Ok(spec)
  }

  fn from_document(path: &Path, hash: ContentHash, document: serde_yaml::Value) -> Result<Self, BuildSpecError> {
    let rendered = serde_yaml::to_string(&document).map_err(|source| BuildSpecError::Encode {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(bytes = rendered.len(), "re-encoded build-step document");
    Ok(Self {
      source: path.to_path_buf(),
      hash,
      document,
      rendered,
    })
  }

  pub fn source(&self) -> &Path {
    &self.source
  }

  /// SHA-256 of the file as read.
  pub fn hash(&self) -> &ContentHash {
    &self.hash
  }

  pub fn document(&self) -> &serde_yaml::Value {
    &self.document
  }

  /// Document re-encoded as YAML.
  pub fn rendered(&self) -> &str {
    &self.rendered
  }
}

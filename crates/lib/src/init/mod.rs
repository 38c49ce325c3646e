//! Scaffold a new stack directory.
//!
//! Writes an options file and a starter build-step document. Existing files
//! are never overwritten.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::{DEFAULT_BUILDSPEC_FILE, DEFAULT_CONFIG_FILE};

pub use templates::{BUILDSPEC_TEMPLATE, WEBSTACK_TOML_TEMPLATE};

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  pub dir: PathBuf,
  pub config: PathBuf,
  pub buildspec: PathBuf,
}

/// Create `dir` if needed and write the starter files into it.
///
/// # Errors
///
/// Returns [`InitError::PathExists`] if either file is already present; in
/// that case nothing is written.
pub fn init(dir: &Path) -> Result<InitResult, InitError> {
  fs::create_dir_all(dir).map_err(|source| InitError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })?;

  let config = dir.join(DEFAULT_CONFIG_FILE);
  let buildspec = dir.join(DEFAULT_BUILDSPEC_FILE);
  for path in [&config, &buildspec] {
    if path.exists() {
      return Err(InitError::PathExists { path: path.clone() });
    }
  }

  write(&config, WEBSTACK_TOML_TEMPLATE)?;
  write(&buildspec, BUILDSPEC_TEMPLATE)?;
  info!(dir = %dir.display(), "initialized stack directory");

  Ok(InitResult {
    dir: dir.to_path_buf(),
    config,
    buildspec,
  })
}

fn write(path: &Path, content: &str) -> Result<(), InitError> {
  fs::write(path, content).map_err(|source| InitError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}

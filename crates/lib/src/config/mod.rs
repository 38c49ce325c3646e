//! Stack options.
//!
//! Options are read from a TOML file (`webstack.toml` by default). Every field
//! is optional; missing fields take the reference deployment's values. Relative
//! paths inside the file resolve against the file's directory.

mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use types::*;

/// Errors that can occur while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read options file {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse options file {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },
}

impl StackOptions {
  /// Load options from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let base_dir = path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));
    let options = Self::from_toml(&content, base_dir).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), stack = %options.stack_name, "loaded stack options");
    Ok(options)
  }

  /// Load options from `path` if it exists, otherwise defaults rooted at `fallback_dir`.
  pub fn load_or_default(path: &Path, fallback_dir: &Path) -> Result<Self, ConfigError> {
    if path.exists() {
      Self::load(path)
    } else {
      debug!(path = %path.display(), "options file not found, using defaults");
      Ok(Self::default().with_base_dir(fallback_dir))
    }
  }

  /// Parse options from TOML text.
  pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
    let options: StackOptions = toml::from_str(content)?;
    Ok(options.with_base_dir(base_dir))
  }
}

//! Output locations.

use std::path::PathBuf;

use crate::consts::{DEFAULT_OUT_DIR, OUT_DIR_ENV};
use crate::util::hash::ObjectHash;

/// Root directory for synthesized templates.
///
/// `$WEBSTACK_OUT_DIR` when set and non-empty, otherwise `stack.out` in the
/// working directory.
pub fn out_dir() -> PathBuf {
  std::env::var(OUT_DIR_ENV)
    .ok()
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
}

/// Directory holding one synthesized template, keyed by its hash.
pub fn template_dir(root: &std::path::Path, hash: &ObjectHash) -> PathBuf {
  root.join(&hash.0)
}

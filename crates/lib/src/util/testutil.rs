//! Test utilities for webstack-lib.
//!
//! Helpers that lay out an options directory with a build-step document so
//! assembly can run against real files.

use std::path::Path;

use tempfile::TempDir;

use crate::config::StackOptions;

/// Minimal build-step document used across tests.
pub const BUILDSPEC_YAML: &str = r#"version: 0.2
phases:
  install:
    commands:
      - npm ci
  build:
    commands:
      - npm run build
  post_build:
    commands:
      - aws s3 sync build/ "$S3BUCKET"
"#;

/// Write `content` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, content: &str) {
  std::fs::write(dir.join(name), content).unwrap();
}

/// Create a temp directory holding `buildspec.yaml` and default options rooted there.
pub fn options_with_buildspec() -> (TempDir, StackOptions) {
  let temp = TempDir::new().unwrap();
  write_file(temp.path(), "buildspec.yaml", BUILDSPEC_YAML);
  let options = StackOptions::default().with_base_dir(temp.path());
  (temp, options)
}

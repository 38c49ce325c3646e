//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary working directory and output root.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Copy the fixture options file and build-step document into a fresh directory.
  pub fn from_fixtures() -> Self {
    let env = Self::empty();
    env.write_file("webstack.toml", &fixture_content("webstack.toml"));
    env.write_file("buildspec.yaml", &fixture_content("buildspec.yaml"));
    env
  }

  /// Create an empty test environment.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("webstack.toml");
    Self { temp, config_path }
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Output root for synthesized templates.
  pub fn out_path(&self) -> PathBuf {
    self.temp.path().join("out")
  }

  /// Every file written below the output root.
  pub fn templates(&self) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(dirs) = std::fs::read_dir(self.out_path()) else {
      return found;
    };
    for dir in dirs.flatten() {
      for file in std::fs::read_dir(dir.path()).unwrap().flatten() {
        found.push(file.path());
      }
    }
    found.sort();
    found
  }

  /// Get a pre-configured Command for the webstack binary.
  ///
  /// Runs inside the temp directory with `WEBSTACK_OUT_DIR` pointing at
  /// [`TestEnv::out_path`].
  pub fn webstack_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("webstack");
    cmd.current_dir(self.temp.path());
    cmd.env("WEBSTACK_OUT_DIR", self.out_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

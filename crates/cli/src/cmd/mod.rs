mod graph;
mod init;
mod synth;

pub use graph::cmd_graph;
pub use init::cmd_init;
pub use synth::cmd_synth;

use std::path::Path;

use anyhow::{Context, Result};
use webstack_lib::config::StackOptions;
use webstack_lib::consts::DEFAULT_CONFIG_FILE;

/// Load options from an explicit `config` path, which must exist.
///
/// Without a path, `webstack.toml` in the working directory is used when
/// present and the built-in defaults otherwise.
fn load_options(config: Option<&str>) -> Result<StackOptions> {
  match config {
    Some(path) => {
      StackOptions::load(Path::new(path)).with_context(|| format!("Failed to load stack options: {}", path))
    }
    None => StackOptions::load_or_default(Path::new(DEFAULT_CONFIG_FILE), Path::new("."))
      .with_context(|| format!("Failed to load stack options: {}", DEFAULT_CONFIG_FILE)),
  }
}

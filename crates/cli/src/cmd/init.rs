//! Implementation of the `webstack init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use webstack_lib::init::init;

use crate::output::symbols;

/// Execute the init command.
///
/// Writes `webstack.toml` and `buildspec.yaml` into `path`, creating the
/// directory if needed.
///
/// # Errors
///
/// Returns an error if either file already exists or cannot be written.
pub fn cmd_init(path: &str) -> Result<()> {
  let result = init(Path::new(path)).context("Failed to initialize stack directory")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized webstack directory!".green().bold()
  );
  println!();
  println!("  {} Directory:      {}", symbols::INFO.cyan(), result.dir.display());
  println!("  {} Options:        {}", symbols::INFO.cyan(), result.config.display());
  println!("  {} Build steps:    {}", symbols::INFO.cyan(), result.buildspec.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} to name your resources",
    result.config.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("webstack synth {}", result.config.display()).cyan()
  );

  Ok(())
}

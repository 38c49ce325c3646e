//! Implementation of the `webstack synth` command.
//!
//! Assembles the stack, synthesizes its template and writes it under an
//! output directory keyed by the template hash.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use webstack_lib::paths::{out_dir, template_dir};
use webstack_lib::stack::assemble;
use webstack_lib::synth::{TemplateFormat, synthesize};
use webstack_lib::util::hash::Hashable;

use super::load_options;
use crate::output::{OutputFormat, print_stat, print_success};

pub fn cmd_synth(config: Option<&str>, out: Option<&Path>, format: OutputFormat) -> Result<()> {
  let options = load_options(config)?;
  let graph = assemble(&options).context("Failed to assemble stack")?;
  let template = synthesize(&graph);

  let hash = template.compute_hash().context("Failed to compute template hash")?;
  let root = out.map(Path::to_path_buf).unwrap_or_else(out_dir);
  let dir = template_dir(&root, &hash);
  fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

  let format = TemplateFormat::from(format);
  let rendered = template.render(format).context("Failed to render template")?;
  let path = dir.join(format!("{}.template.{}", options.stack_name, format.extension()));
  fs::write(&path, &rendered).with_context(|| format!("Failed to write template: {}", path.display()))?;
  debug!(path = %path.display(), bytes = rendered.len(), "wrote template");

  print_success(&format!("Synthesized {}", options.stack_name));
  print_stat("Template", &hash.0);
  print_stat("Resources", &template.resources.len().to_string());
  print_stat("Outputs", &template.outputs.len().to_string());
  print_stat("Path", &path.display().to_string());

  Ok(())
}

//! Implementation of the `webstack graph` command.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use webstack_lib::graph::LogicalId;
use webstack_lib::stack::assemble;

use super::load_options;
use crate::output::{print_info, print_json, symbols};

#[derive(Serialize)]
struct GraphEntry<'a> {
  id: &'a str,
  #[serde(rename = "type")]
  resource_type: &'a str,
  external: bool,
  depends_on: Vec<&'a str>,
}

/// Print every node after the nodes it depends on.
///
/// External handles are listed too; they are resolved by name and never
/// emitted into the template.
pub fn cmd_graph(config: Option<&str>, json: bool) -> Result<()> {
  let options = load_options(config)?;
  let graph = assemble(&options).context("Failed to assemble stack")?;

  let entries: Vec<GraphEntry> = graph
    .nodes()
    .map(|node| GraphEntry {
      id: node.id.as_str(),
      resource_type: node.kind.type_name(),
      external: node.kind.is_external(),
      depends_on: graph.dependencies_of(&node.id).into_iter().map(LogicalId::as_str).collect(),
    })
    .collect();

  if json {
    return print_json(&entries);
  }

  print_info(&format!("{} ({} nodes)", options.stack_name, entries.len()));
  for entry in &entries {
    let marker = if entry.external { symbols::EXTERNAL } else { symbols::NODE };
    println!(
      "  {} {} {}",
      marker,
      entry.id,
      entry.resource_type.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    for dependency in &entry.depends_on {
      println!("      {} {}", symbols::ARROW, dependency);
    }
  }

  Ok(())
}

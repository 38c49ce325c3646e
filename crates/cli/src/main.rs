mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use webstack_lib::consts::APP_NAME;

use crate::output::OutputFormat;

/// webstack - synthesize a static web hosting and delivery stack
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Synthesize the stack template
  Synth {
    /// Path to the options file (default: webstack.toml, or built-in defaults when absent)
    config: Option<String>,

    /// Output root (default: $WEBSTACK_OUT_DIR or stack.out)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Template encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
  },

  /// Show resources in dependency order
  Graph {
    /// Path to the options file (default: webstack.toml, or built-in defaults when absent)
    config: Option<String>,

    /// Print the graph as JSON
    #[arg(long)]
    json: bool,
  },

  /// Scaffold an options file and build-step document
  Init {
    /// Directory to initialize
    #[arg(default_value = ".")]
    path: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Synth { config, out, format } => cmd::cmd_synth(config.as_deref(), out.as_deref(), format),
    Commands::Graph { config, json } => cmd::cmd_graph(config.as_deref(), json),
    Commands::Init { path } => cmd::cmd_init(&path),
  }
}

//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cinematic::{EditArgs, ListArgs, NewArgs, ShowArgs},
    completions::CompletionsArgs,
    init::InitArgs,
    schema::SchemaCommands,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "cine")]
#[command(author, version, about = "Cinematic Toolkit")]
#[command(long_about = "Author and validate cinematic shot/dialog documents stored as plain YAML files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .cine/)
    #[arg(long, global = true, env = "CINE_PROJECT")]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cinematic project
    Init(InitArgs),

    /// Create a new cinematic from the starter template
    New(NewArgs),

    /// List cinematics in the project
    List(ListArgs),

    /// Show a cinematic
    Show(ShowArgs),

    /// Open a cinematic in your editor
    Edit(EditArgs),

    /// Validate cinematic files against the schema
    Validate(ValidateArgs),

    /// Inspect and export schemas
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, table for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// Just slugs, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `auto` against a configured default
    pub fn or_configured(self, configured: Option<&str>) -> Self {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}

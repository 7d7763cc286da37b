//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use harmony::core::DependencyRequest;
use harmony::ops::OutputFormat;

/// Harmony - harmonizes build configuration across plugin-contributed modules
#[derive(Parser)]
#[command(name = "harmony")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the harmonization pass over every module
    Apply(ApplyArgs),

    /// Show the version selected for a dependency request
    Resolve(ResolveArgs),

    /// Remove the unified build directory
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Report what would change without rewriting descriptor files
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Dependency request in group:name:version notation
    pub request: DependencyRequest,

    /// Only resolve on behalf of this module
    #[arg(long, short)]
    pub module: Option<String>,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

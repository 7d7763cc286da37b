//! Harmony CLI - build configuration harmonizer for multi-module projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use harmony::util::GlobalContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("harmony=debug")
    } else {
        EnvFilter::new("harmony=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(ctx.color())
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Apply(args) => commands::apply::execute(args, &ctx),
        Commands::Resolve(args) => commands::resolve::execute(args, &ctx),
        Commands::Clean(args) => commands::clean::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

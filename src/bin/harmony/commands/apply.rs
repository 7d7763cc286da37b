//! `harmony apply` command

use anyhow::Result;

use crate::cli::ApplyArgs;
use harmony::core::Workspace;
use harmony::ops::{apply, format_result, format_result_json, ApplyOptions, OutputFormat};
use harmony::util::GlobalContext;

pub fn execute(args: ApplyArgs, ctx: &GlobalContext) -> Result<()> {
    let manifest_path = ctx.find_manifest()?;
    let ws = Workspace::new(&manifest_path)?;

    // Load configuration (global + project)
    let config = ctx.load_config(ws.root());

    let opts = ApplyOptions {
        dry_run: args.dry_run,
    };
    let result = apply(&ws, &config, &opts)?;

    match args.format {
        OutputFormat::Human => print!("{}", format_result(&result)),
        OutputFormat::Json => println!("{}", format_result_json(&result)),
    }

    Ok(())
}

//! `harmony resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use harmony::core::Workspace;
use harmony::ops::resolve_request;
use harmony::util::GlobalContext;

pub fn execute(args: ResolveArgs, ctx: &GlobalContext) -> Result<()> {
    let manifest_path = ctx.find_manifest()?;
    let ws = Workspace::new(&manifest_path)?;
    let config = ctx.load_config(ws.root());

    let resolved = resolve_request(&ws, &config, &args.request, args.module.as_deref())?;
    for (module, dep) in resolved {
        let marker = if dep.forced { " (pinned)" } else { "" };
        println!("{}: {} -> {}{}", module, args.request, dep.version, marker);
    }

    Ok(())
}

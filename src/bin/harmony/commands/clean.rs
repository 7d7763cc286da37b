//! `harmony clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use harmony::core::Workspace;
use harmony::ops::clean;
use harmony::util::GlobalContext;

pub fn execute(_args: CleanArgs, ctx: &GlobalContext) -> Result<()> {
    let manifest_path = ctx.find_manifest()?;
    let ws = Workspace::new(&manifest_path)?;

    let result = clean(&ws)?;
    if result.removed {
        eprintln!("     Removed {}", result.path.display());
    } else if ctx.is_verbose() {
        eprintln!("     Nothing to remove at {}", result.path.display());
    }

    Ok(())
}

//! Evaluation timing gate.
//!
//! Harmonization must observe a module after its plugins have attached their
//! extensions. The gate runs the pass right away for a module that is already
//! evaluated and defers it to the module's ready hook otherwise.

use anyhow::Result;
use serde::Serialize;

use crate::core::module::Module;
use crate::core::project::Project;

/// When a scheduled pass runs relative to its registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// The module was already evaluated
    Immediate,
    /// Fired once the module finishes evaluating
    Deferred,
}

/// Schedule `pass` for `module`.
pub fn schedule<F>(project: &mut Project, module: &str, pass: F) -> Result<Timing>
where
    F: FnOnce(&mut Module, Timing) -> Result<()> + 'static,
{
    let timing = match project.module(module) {
        Some(m) if m.is_evaluated() => Timing::Immediate,
        _ => Timing::Deferred,
    };
    tracing::trace!("scheduling harmonization of :{} ({:?})", module, timing);
    project.on_ready(module, Box::new(move |m| pass(m, timing)))?;
    Ok(timing)
}

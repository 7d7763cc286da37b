//! Compiler target alignment.
//!
//! Every packaged component gets the same source/target compatibility, library
//! components additionally get the same compile SDK, and every toolchain
//! compile surface of the module gets the same JVM target. Each sub-step is
//! independent. A finalized extension is skipped, never an error.

use serde::Serialize;

use crate::core::extension::{JvmVersion, Variant};
use crate::core::module::Module;
use crate::harmonize::errors::HarmonizeError;

/// Result of one alignment sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Applied,
    /// Extension already finalized by the engine
    SkippedFinalized,
    /// The module does not expose this surface
    NotApplicable,
}

/// What the aligner did to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentOutcome {
    pub compile_options: Step,
    pub compile_sdk: Step,
    /// Number of toolchain compile tasks updated
    pub toolchain_tasks: usize,
    pub toolchain_extension: Step,
}

/// Align compile levels of a module classified as `variant`.
pub fn align_targets(
    module: &mut Module,
    variant: Option<Variant>,
    jvm_target: JvmVersion,
    compile_sdk: u32,
) -> Result<AlignmentOutcome, HarmonizeError> {
    let path = module.path();
    let mut outcome = AlignmentOutcome {
        compile_options: Step::NotApplicable,
        compile_sdk: Step::NotApplicable,
        toolchain_tasks: 0,
        toolchain_extension: Step::NotApplicable,
    };

    if let (Some(variant), Some(component)) = (variant, module.component_mut()) {
        if component.is_finalized() {
            tracing::debug!("{}: extension finalized, skipping compile levels", path);
            outcome.compile_options = Step::SkippedFinalized;
            if variant == Variant::Library {
                outcome.compile_sdk = Step::SkippedFinalized;
            }
        } else {
            component.set_compatibility(jvm_target, jvm_target)?;
            outcome.compile_options = Step::Applied;
            if variant == Variant::Library {
                component.set_compile_sdk(compile_sdk)?;
                outcome.compile_sdk = Step::Applied;
            }
        }
    }

    for target in module.toolchain_compile_targets_mut() {
        *target = Some(jvm_target);
        outcome.toolchain_tasks += 1;
    }

    if let Some(toolchain) = module.toolchain_mut() {
        toolchain.jvm_target = Some(jvm_target);
        outcome.toolchain_extension = Step::Applied;
    }

    tracing::debug!(
        "{}: aligned to JVM {} ({} toolchain task(s))",
        path,
        jvm_target,
        outcome.toolchain_tasks
    );
    Ok(outcome)
}

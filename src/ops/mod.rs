//! High-level operations.
//!
//! This module contains the implementation of Harmony commands.

pub mod harmony_apply;
pub mod harmony_clean;
pub mod resolve;

pub use harmony_apply::{
    apply, format_result, format_result_json, ApplyOptions, ApplyResult, ModuleResolutions,
    OutputFormat,
};
pub use harmony_clean::{clean, CleanResult};
pub use resolve::{install_workspace_rules, resolve_request};

//! Dependency resolution rules.
//!
//! Resolution here only narrows the version selected for specific
//! coordinates; graph resolution belongs to the build engine.

pub mod resolve;
pub mod rules;

pub use resolve::{resolve_module, resolve_project};
pub use rules::{ResolutionRules, ResolvedDependency, VersionPin};

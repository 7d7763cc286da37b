//! Harmony - build configuration harmonizer for multi-module projects
//!
//! This crate provides the harmonization pass that repairs plugin-contributed
//! modules before they are built: missing namespaces, stale descriptor
//! package declarations, diverging compile levels and mismatched versions of
//! the shared foundation library.

pub mod core;
pub mod harmonize;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for Harmony unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides fixtures that lay out projects, modules and
/// descriptor files on disk.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Manifest, Module, Project, Workspace};
pub use harmonize::{HarmonizeOptions, Harmonizer, ModuleReport};
pub use resolver::{ResolutionRules, VersionPin};
pub use util::context::GlobalContext;

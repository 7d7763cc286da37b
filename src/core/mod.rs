//! Core data structures for Harmony.
//!
//! This module contains the project model harmonization works on:
//! - Identifiers and dependency coordinates
//! - Extensions attached by plugins, and the plugins themselves
//! - Modules and the project graph with its evaluation lifecycle
//! - The Harmony.toml manifest and workspace loading

pub mod coordinate;
pub mod extension;
pub mod identifier;
pub mod manifest;
pub mod module;
pub mod plugin;
pub mod project;
pub mod workspace;

pub use coordinate::{Coordinate, CoordinateError, DependencyRequest};
pub use extension::{
    Capability, CompileOptions, ExtensionError, ExtensionState, JvmVersion,
    PackagedComponentExtension, ToolchainExtension, Variant,
};
pub use identifier::Identifier;
pub use manifest::Manifest;
pub use module::{EvaluationState, Module, ModuleSettings, Task, TaskKind};
pub use plugin::PluginId;
pub use project::{Project, ProjectError, ReadyAction};
pub use workspace::{find_manifest, ManifestError, Workspace, DEFAULT_BUILD_DIR, MANIFEST_NAME};

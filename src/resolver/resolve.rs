//! Resolve a module's declared dependencies against the installed rules.
//!
//! Only the selected version is computed; transitive graphs are left to the
//! build engine.

use crate::core::module::Module;
use crate::core::project::Project;
use crate::resolver::rules::{ResolutionRules, ResolvedDependency};

/// Resolve every dependency a module declares.
pub fn resolve_module(module: &Module, rules: &ResolutionRules) -> Vec<ResolvedDependency> {
    module
        .dependencies()
        .iter()
        .map(|request| rules.resolve(module.name(), request))
        .collect()
}

/// Resolve the declared dependencies of every module, in declaration order.
pub fn resolve_project(
    project: &Project,
    rules: &ResolutionRules,
) -> Vec<(String, Vec<ResolvedDependency>)> {
    project
        .modules()
        .map(|module| (module.name().to_string(), resolve_module(module, rules)))
        .collect()
}

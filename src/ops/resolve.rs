//! Query the version rules for a dependency request.

use anyhow::Result;

use crate::core::coordinate::DependencyRequest;
use crate::core::project::ProjectError;
use crate::core::Workspace;
use crate::harmonize::install_pins;
use crate::resolver::{ResolutionRules, ResolvedDependency};
use crate::util::config::Config;

/// Install the configured pins for every module of the workspace.
///
/// Pin installation does not depend on evaluation, so the project is built
/// but never evaluated.
pub fn install_workspace_rules(ws: &Workspace, config: &Config) -> Result<ResolutionRules> {
    let options = config.harmonize_options();
    let project = ws.to_project()?;

    let mut rules = ResolutionRules::new();
    for name in project.module_names() {
        install_pins(&mut rules, &name, &options.pins);
    }
    Ok(rules)
}

/// Resolve `request` on behalf of one module, or of every module when
/// `module` is `None`.
pub fn resolve_request(
    ws: &Workspace,
    config: &Config,
    request: &DependencyRequest,
    module: Option<&str>,
) -> Result<Vec<(String, ResolvedDependency)>> {
    let rules = install_workspace_rules(ws, config)?;
    let modules: Vec<String> = match module {
        Some(name) => {
            if !ws.manifest().modules.iter().any(|m| m.name == name) {
                return Err(ProjectError::UnknownModule(name.to_string()).into());
            }
            vec![name.to_string()]
        }
        None => ws.manifest().modules.iter().map(|m| m.name.clone()).collect(),
    };

    Ok(modules
        .into_iter()
        .map(|name| {
            let resolved = rules.resolve(&name, request);
            (name, resolved)
        })
        .collect())
}

//! Namespace inference for library modules.

use serde::Serialize;

use crate::core::identifier::Identifier;
use crate::core::module::Module;
use crate::harmonize::errors::HarmonizeError;

/// What the namespace pass did to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "namespace", rename_all = "snake_case")]
pub enum NamespaceOutcome {
    /// A namespace was inferred and assigned
    Assigned(Identifier),
    /// The module already declared one; it was left alone
    Kept(Identifier),
    /// The module has no packaged-component extension
    NotApplicable,
}

impl NamespaceOutcome {
    /// Check whether this run assigned a new namespace.
    pub fn is_assigned(&self) -> bool {
        matches!(self, NamespaceOutcome::Assigned(_))
    }
}

/// Assign `<group>.<name>` (dashes replaced) to a module without a namespace.
///
/// An existing namespace is never overwritten. Assigning to a finalized
/// extension is rejected and returned as an error.
pub fn infer_namespace(module: &mut Module) -> Result<NamespaceOutcome, HarmonizeError> {
    let path = module.path();
    let inferred = Identifier::infer(module.group(), module.name());

    let Some(component) = module.component_mut() else {
        return Ok(NamespaceOutcome::NotApplicable);
    };
    if let Some(existing) = component.namespace() {
        tracing::debug!("{} keeps namespace `{}`", path, existing);
        return Ok(NamespaceOutcome::Kept(existing.clone()));
    }

    if !inferred.is_well_formed() {
        tracing::warn!("{} gets malformed namespace `{}`", path, inferred);
    }
    component
        .set_namespace(inferred.clone())
        .map_err(|source| HarmonizeError::Namespace {
            module: path.clone(),
            namespace: inferred.to_string(),
            source,
        })?;
    tracing::info!("{}: assigned namespace `{}`", path, inferred);
    Ok(NamespaceOutcome::Assigned(inferred))
}

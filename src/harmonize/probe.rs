//! Capability probe - classify a module's packaged component.

use std::collections::BTreeSet;

use crate::core::extension::{Capability, Variant};
use crate::core::module::Module;

/// Classify the module's packaged-component extension, if it has one.
///
/// Library and Application narrow Base; a component declaring both library
/// and application capabilities is treated as a library.
pub fn probe(module: &Module) -> Option<Variant> {
    let component = module.component()?;
    classify(component.capabilities())
}

/// Pick the most specific variant from a declared capability set.
pub fn classify(capabilities: &BTreeSet<Capability>) -> Option<Variant> {
    if capabilities.contains(&Capability::Library) {
        Some(Variant::Library)
    } else if capabilities.contains(&Capability::Application) {
        Some(Variant::Application)
    } else if capabilities.contains(&Capability::Base) {
        Some(Variant::Base)
    } else {
        None
    }
}

//! Dependency version pinner.
//!
//! Installs the configured version pins for a module. Installation has no
//! precondition on the module's extensions.

use crate::resolver::{ResolutionRules, VersionPin};

/// Install `pins` for every resolution made on behalf of `module`.
///
/// Returns the number of rules that were not installed already.
pub fn install_pins(rules: &mut ResolutionRules, module: &str, pins: &[VersionPin]) -> usize {
    let mut installed = 0;
    for pin in pins {
        if rules.install(module, pin.clone()) {
            tracing::trace!("pinned {} to {} for :{}", pin.coordinate, pin.version, module);
            installed += 1;
        }
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinate::DependencyRequest;

    #[test]
    fn test_install_is_absorbed_on_repeat() {
        let mut rules = ResolutionRules::new();
        let pins = vec![VersionPin::kotlin_stdlib()];
        assert_eq!(install_pins(&mut rules, "lib-a", &pins), 1);
        assert_eq!(install_pins(&mut rules, "lib-a", &pins), 0);
        assert_eq!(install_pins(&mut rules, "app", &pins), 1);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_pin_applies_to_installed_module_only() {
        let mut rules = ResolutionRules::new();
        install_pins(&mut rules, "lib-a", &[VersionPin::kotlin_stdlib()]);

        let request = DependencyRequest::new("org.jetbrains.kotlin", "kotlin-stdlib", "1.8.0");
        assert_eq!(rules.resolve("lib-a", &request).version, "1.9.22");
        assert_eq!(rules.resolve("other", &request).version, "1.8.0");
    }
}

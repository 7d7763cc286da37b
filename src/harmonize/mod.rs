//! The harmonization pass.
//!
//! For every module the pass
//! - installs the configured version pins (unconditionally, right away), and
//! - schedules probe -> namespace -> descriptor -> alignment through the
//!   evaluation gate, so it runs on the fully configured extension.
//!
//! Every step is idempotent: running the pass twice leaves modules and
//! descriptors as a single run would.

pub mod align;
pub mod descriptor;
pub mod errors;
pub mod gate;
pub mod namespace;
pub mod pin;
pub mod probe;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;

use crate::core::extension::{JvmVersion, Variant};
use crate::core::module::Module;
use crate::core::project::Project;
use crate::resolver::{ResolutionRules, VersionPin};

pub use align::{align_targets, AlignmentOutcome, Step};
pub use descriptor::{sanitize_descriptor, strip_package_attributes, DescriptorOutcome};
pub use errors::HarmonizeError;
pub use gate::Timing;
pub use namespace::{infer_namespace, NamespaceOutcome};
pub use pin::install_pins;
pub use probe::probe;

/// JVM level every module is aligned to.
pub const DEFAULT_JVM_TARGET: JvmVersion = JvmVersion::VERSION_11;

/// Compile SDK level forced on library modules.
pub const DEFAULT_COMPILE_SDK: u32 = 35;

/// Descriptor path relative to a module root.
pub const DEFAULT_DESCRIPTOR: &str = "src/main/AndroidManifest.xml";

/// Settings for one harmonization run.
#[derive(Debug, Clone)]
pub struct HarmonizeOptions {
    pub jvm_target: JvmVersion,
    pub compile_sdk: u32,
    /// Descriptor location relative to each module root
    pub descriptor: PathBuf,
    pub pins: Vec<VersionPin>,
    /// Persist descriptor rewrites (false for a dry run)
    pub write_descriptors: bool,
}

impl Default for HarmonizeOptions {
    fn default() -> Self {
        HarmonizeOptions {
            jvm_target: DEFAULT_JVM_TARGET,
            compile_sdk: DEFAULT_COMPILE_SDK,
            descriptor: PathBuf::from(DEFAULT_DESCRIPTOR),
            pins: vec![VersionPin::kotlin_stdlib()],
            write_descriptors: true,
        }
    }
}

/// What harmonization did to one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub variant: Option<Variant>,
    pub timing: Timing,
    pub namespace: NamespaceOutcome,
    /// Only present when a namespace was newly assigned
    pub descriptor: Option<DescriptorOutcome>,
    pub alignment: AlignmentOutcome,
}

/// Run probe, namespace, descriptor and alignment on one evaluated module.
pub fn harmonize_module(
    module: &mut Module,
    options: &HarmonizeOptions,
    timing: Timing,
) -> Result<ModuleReport, HarmonizeError> {
    let variant = probe(module);
    tracing::debug!(
        "harmonizing {} ({})",
        module.path(),
        variant.map_or("no component", |v| v.as_str())
    );

    let namespace = match variant {
        Some(Variant::Library) => infer_namespace(module)?,
        _ => NamespaceOutcome::NotApplicable,
    };

    let descriptor = if namespace.is_assigned() {
        let path = module.root().join(&options.descriptor);
        Some(sanitize_descriptor(&path, options.write_descriptors)?)
    } else {
        None
    };

    let alignment = align_targets(module, variant, options.jvm_target, options.compile_sdk)?;

    Ok(ModuleReport {
        module: module.name().to_string(),
        variant,
        timing,
        namespace,
        descriptor,
        alignment,
    })
}

/// Wires the harmonization pass into a project.
#[derive(Debug, Clone)]
pub struct Harmonizer {
    options: Rc<HarmonizeOptions>,
    reports: Rc<RefCell<Vec<ModuleReport>>>,
}

impl Harmonizer {
    /// Create a harmonizer with the given options.
    pub fn new(options: HarmonizeOptions) -> Self {
        Harmonizer {
            options: Rc::new(options),
            reports: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn options(&self) -> &HarmonizeOptions {
        &self.options
    }

    /// Register the pass for every module of `project`.
    ///
    /// Pins go into `rules` immediately. Modules that are already evaluated
    /// are harmonized before this returns; the rest are harmonized as they
    /// finish evaluating.
    pub fn register(&self, project: &mut Project, rules: &mut ResolutionRules) -> Result<()> {
        for name in project.module_names() {
            install_pins(rules, &name, &self.options.pins);

            let options = Rc::clone(&self.options);
            let reports = Rc::clone(&self.reports);
            gate::schedule(project, &name, move |module, timing| {
                let report = harmonize_module(module, &options, timing)?;
                reports.borrow_mut().push(report);
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Reports of every pass that has run so far, in execution order.
    pub fn reports(&self) -> Vec<ModuleReport> {
        self.reports.borrow().clone()
    }

    /// The most recent report for a module.
    pub fn report(&self, module: &str) -> Option<ModuleReport> {
        self.reports
            .borrow()
            .iter()
            .rev()
            .find(|r| r.module == module)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extension::{CompileOptions, PackagedComponentExtension};
    use crate::core::identifier::Identifier;
    use crate::core::module::ModuleSettings;
    use crate::core::plugin::PluginId;
    use crate::test_support::{read_descriptor, write_descriptor};
    use std::fs;
    use tempfile::TempDir;

    const LEGACY_MANIFEST: &str =
        "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\"\n    package=\"com.example.lib_a\">\n</manifest>\n";

    fn two_module_project(tmp: &TempDir) -> Project {
        let root = tmp.path();
        let mut project = Project::new("android", root);
        project
            .add_module(
                Module::new("lib-a", "com.example", root.join("lib-a"))
                    .with_plugin(PluginId::Library)
                    .with_plugin(PluginId::KotlinAndroid)
                    .with_dependency("org.jetbrains.kotlin:kotlin-stdlib:1.8.0".parse().unwrap()),
            )
            .unwrap();
        project
            .add_module(
                Module::new("app-b", "com.example", root.join("app-b"))
                    .with_plugin(PluginId::Application)
                    .with_settings(ModuleSettings {
                        namespace: Some(Identifier::new("com.example.app")),
                        ..Default::default()
                    }),
            )
            .unwrap();
        project
    }

    fn snapshot(project: &Project) -> Vec<(String, Option<PackagedComponentExtension>)> {
        project
            .modules()
            .map(|m| (m.name().to_string(), m.component().cloned()))
            .collect()
    }

    #[test]
    fn test_end_to_end_two_modules() {
        let tmp = TempDir::new().unwrap();
        write_descriptor(&tmp.path().join("lib-a"), LEGACY_MANIFEST);
        let mut project = two_module_project(&tmp);
        let mut rules = ResolutionRules::new();

        let harmonizer = Harmonizer::new(HarmonizeOptions::default());
        harmonizer.register(&mut project, &mut rules).unwrap();
        assert_eq!(project.pending_actions(), 2);
        project.evaluate_all().unwrap();

        let lib = project.module("lib-a").unwrap().component().unwrap();
        assert_eq!(lib.namespace().unwrap().as_str(), "com.example.lib_a");
        assert_eq!(lib.compile_sdk(), Some(35));
        assert_eq!(
            lib.compile_options(),
            &CompileOptions {
                source_compatibility: Some(JvmVersion::VERSION_11),
                target_compatibility: Some(JvmVersion::VERSION_11),
            }
        );
        assert_eq!(
            read_descriptor(&tmp.path().join("lib-a")),
            "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\"\n    >\n</manifest>\n"
        );

        let app = project.module("app-b").unwrap().component().unwrap();
        assert_eq!(app.namespace().unwrap().as_str(), "com.example.app");
        assert_eq!(app.compile_sdk(), None);

        let report = harmonizer.report("lib-a").unwrap();
        assert_eq!(report.timing, Timing::Deferred);
        assert_eq!(report.variant, Some(Variant::Library));
        assert_eq!(
            report.descriptor,
            Some(DescriptorOutcome::Stripped {
                removed: 1,
                written: true
            })
        );
        let report = harmonizer.report("app-b").unwrap();
        assert_eq!(report.namespace, NamespaceOutcome::NotApplicable);
        assert_eq!(report.descriptor, None);

        let stdlib = "org.jetbrains.kotlin:kotlin-stdlib:1.8.0".parse().unwrap();
        assert_eq!(rules.resolve("lib-a", &stdlib).version, "1.9.22");
        assert_eq!(rules.resolve("app-b", &stdlib).version, "1.9.22");
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write_descriptor(&tmp.path().join("lib-a"), LEGACY_MANIFEST);
        let mut project = two_module_project(&tmp);
        let mut rules = ResolutionRules::new();

        let harmonizer = Harmonizer::new(HarmonizeOptions::default());
        harmonizer.register(&mut project, &mut rules).unwrap();
        project.evaluate_all().unwrap();
        let state = snapshot(&project);
        let descriptor = read_descriptor(&tmp.path().join("lib-a"));
        let rule_count = rules.len();

        // Modules are evaluated now, so the second registration runs immediately.
        harmonizer.register(&mut project, &mut rules).unwrap();
        assert_eq!(project.pending_actions(), 0);
        assert_eq!(snapshot(&project), state);
        assert_eq!(read_descriptor(&tmp.path().join("lib-a")), descriptor);
        assert_eq!(rules.len(), rule_count);

        let report = harmonizer.report("lib-a").unwrap();
        assert_eq!(report.timing, Timing::Immediate);
        assert_eq!(
            report.namespace,
            NamespaceOutcome::Kept(Identifier::new("com.example.lib_a"))
        );
        assert_eq!(report.descriptor, None);
    }

    #[test]
    fn test_existing_namespace_leaves_descriptor_alone() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("lib-c");
        write_descriptor(&root, LEGACY_MANIFEST);

        let mut project = Project::new("android", tmp.path());
        project
            .add_module(
                Module::new("lib-c", "com.example", &root)
                    .with_plugin(PluginId::Library)
                    .with_settings(ModuleSettings {
                        namespace: Some(Identifier::new("org.vendor.c")),
                        ..Default::default()
                    }),
            )
            .unwrap();
        Harmonizer::new(HarmonizeOptions::default())
            .register(&mut project, &mut ResolutionRules::new())
            .unwrap();
        project.evaluate_all().unwrap();

        assert_eq!(read_descriptor(&root), LEGACY_MANIFEST);
    }

    #[test]
    fn test_dry_run_does_not_touch_descriptor() {
        let tmp = TempDir::new().unwrap();
        write_descriptor(&tmp.path().join("lib-a"), LEGACY_MANIFEST);
        let mut project = two_module_project(&tmp);

        let harmonizer = Harmonizer::new(HarmonizeOptions {
            write_descriptors: false,
            ..Default::default()
        });
        harmonizer
            .register(&mut project, &mut ResolutionRules::new())
            .unwrap();
        project.evaluate_all().unwrap();

        assert_eq!(read_descriptor(&tmp.path().join("lib-a")), LEGACY_MANIFEST);
        assert_eq!(
            harmonizer.report("lib-a").unwrap().descriptor,
            Some(DescriptorOutcome::Stripped {
                removed: 1,
                written: false
            })
        );
    }

    #[test]
    fn test_custom_levels() {
        let tmp = TempDir::new().unwrap();
        let mut project = two_module_project(&tmp);
        let harmonizer = Harmonizer::new(HarmonizeOptions {
            jvm_target: JvmVersion::VERSION_17,
            compile_sdk: 34,
            ..Default::default()
        });
        harmonizer
            .register(&mut project, &mut ResolutionRules::new())
            .unwrap();
        project.evaluate_all().unwrap();

        let lib = project.module("lib-a").unwrap();
        assert_eq!(lib.component().unwrap().compile_sdk(), Some(34));
        assert_eq!(lib.toolchain().unwrap().jvm_target, Some(JvmVersion::VERSION_17));
    }

    #[test]
    fn test_descriptor_read_failure_aborts_evaluation() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("lib-a");
        // A directory where the descriptor should be cannot be read as text.
        fs::create_dir_all(root.join(DEFAULT_DESCRIPTOR)).unwrap();

        let mut project = Project::new("android", tmp.path());
        project
            .add_module(Module::new("lib-a", "com.example", &root).with_plugin(PluginId::Library))
            .unwrap();
        Harmonizer::new(HarmonizeOptions::default())
            .register(&mut project, &mut ResolutionRules::new())
            .unwrap();

        let err = project.evaluate_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarmonizeError>(),
            Some(HarmonizeError::ReadDescriptor { .. })
        ));
    }

    #[test]
    fn test_descriptor_write_failure_aborts_evaluation() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("lib-a");
        let path = write_descriptor(&root, "<manifest package=\"com.x.y\"> <A/> </manifest>");
        if !crate::test_support::make_readonly(&path) {
            return;
        }

        let mut project = Project::new("android", tmp.path());
        project
            .add_module(Module::new("lib-a", "com.example", &root).with_plugin(PluginId::Library))
            .unwrap();
        Harmonizer::new(HarmonizeOptions::default())
            .register(&mut project, &mut ResolutionRules::new())
            .unwrap();

        let err = project.evaluate_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarmonizeError>(),
            Some(HarmonizeError::WriteDescriptor { .. })
        ));
        assert_eq!(
            read_descriptor(&root),
            "<manifest package=\"com.x.y\"> <A/> </manifest>"
        );
    }
}

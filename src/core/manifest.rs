//! Harmony.toml manifest parsing and schema.
//!
//! The manifest stands in for the module registry: it lists every module of
//! the project with the plugins it applies and the settings its build script
//! declares. Harmonization never writes it back.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::coordinate::DependencyRequest;
use crate::core::extension::JvmVersion;
use crate::core::identifier::Identifier;
use crate::core::module::{Module, ModuleSettings};
use crate::core::plugin::PluginId;

/// `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSection {
    pub name: String,

    /// Default group for modules that do not declare one
    #[serde(default)]
    pub group: Option<String>,

    /// Unified build directory, relative to the project root
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Module every other module evaluates after
    #[serde(default)]
    pub evaluation_anchor: Option<String>,
}

/// `[module.android]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentDecl {
    pub namespace: Option<String>,
    pub compile_sdk: Option<u32>,
    pub source_compatibility: Option<JvmVersion>,
    pub target_compatibility: Option<JvmVersion>,
    #[serde(default)]
    pub finalized: bool,
}

/// `[module.kotlin]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolchainDecl {
    pub jvm_target: Option<JvmVersion>,
}

/// One `[[module]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDecl {
    pub name: String,

    #[serde(default)]
    pub group: Option<String>,

    /// Module directory relative to the project root (defaults to the name)
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub plugins: Vec<PluginId>,

    /// Dependencies in `group:name:version` notation
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub evaluation_depends_on: Vec<String>,

    #[serde(default)]
    pub android: Option<ComponentDecl>,

    #[serde(default)]
    pub kotlin: Option<ToolchainDecl>,
}

/// A parsed Harmony.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub project: ProjectSection,

    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDecl>,
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse and validate manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        manifest
            .validate()
            .with_context(|| format!("invalid manifest: {}", path.display()))?;
        Ok(manifest)
    }

    /// Get the project name.
    pub fn name(&self) -> &str {
        &self.project.name
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                bail!("module name must not be empty");
            }
            if !seen.insert(module.name.as_str()) {
                bail!("module `{}` is declared more than once", module.name);
            }
        }

        for module in &self.modules {
            for dependency in &module.evaluation_depends_on {
                if !seen.contains(dependency.as_str()) {
                    bail!(
                        "module `{}` evaluates after unknown module `{}`",
                        module.name,
                        dependency
                    );
                }
            }
            for coordinate in &module.dependencies {
                coordinate.parse::<DependencyRequest>().with_context(|| {
                    format!("invalid dependency in module `{}`", module.name)
                })?;
            }
        }

        if let Some(anchor) = &self.project.evaluation_anchor {
            if !seen.contains(anchor.as_str()) {
                bail!("evaluation anchor `{}` is not a declared module", anchor);
            }
        }
        Ok(())
    }

    /// Build an unevaluated module from its declaration.
    pub fn to_module(&self, decl: &ModuleDecl, project_root: &Path) -> Result<Module> {
        let group = decl
            .group
            .clone()
            .or_else(|| self.project.group.clone())
            .unwrap_or_default();
        let root = project_root.join(decl.path.as_deref().unwrap_or(Path::new(&decl.name)));

        let component = decl.android.clone().unwrap_or_default();
        let settings = ModuleSettings {
            namespace: component.namespace.map(Identifier::new),
            compile_sdk: component.compile_sdk,
            source_compatibility: component.source_compatibility,
            target_compatibility: component.target_compatibility,
            finalized: component.finalized,
            toolchain_jvm_target: decl.kotlin.as_ref().and_then(|k| k.jvm_target),
        };

        let mut module = Module::new(&decl.name, group, root).with_settings(settings);
        for plugin in &decl.plugins {
            module = module.with_plugin(plugin.clone());
        }
        for coordinate in &decl.dependencies {
            let request = coordinate
                .parse::<DependencyRequest>()
                .with_context(|| format!("invalid dependency in module `{}`", decl.name))?;
            module = module.with_dependency(request);
        }
        for dependency in &decl.evaluation_depends_on {
            module = module.evaluates_after(dependency);
        }
        Ok(module)
    }
}

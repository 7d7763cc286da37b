//! Plugins that contribute extensions and tasks to a module.
//!
//! Plugins are applied while the module evaluates. Component plugins attach
//! the packaged-component extension and copy the module's declared settings
//! into it; the toolchain plugin attaches the toolchain extension and its
//! compile tasks. Unknown plugin ids are kept but contribute nothing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::extension::{
    Capability, ExtensionError, PackagedComponentExtension, ToolchainExtension,
};
use crate::core::module::{Module, Task};

/// Build variants for which the toolchain plugin registers compile tasks.
const BUILD_VARIANTS: &[&str] = &["Debug", "Release"];

/// A plugin applied to a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluginId {
    /// `com.android.library`
    Library,
    /// `com.android.application`
    Application,
    /// `com.android.test`
    Test,
    /// `com.android.dynamic-feature`
    DynamicFeature,
    /// `org.jetbrains.kotlin.android` / `kotlin-android`
    KotlinAndroid,
    /// Any plugin we do not model
    Other(String),
}

impl PluginId {
    /// Get the canonical plugin id.
    pub fn as_str(&self) -> &str {
        match self {
            PluginId::Library => "com.android.library",
            PluginId::Application => "com.android.application",
            PluginId::Test => "com.android.test",
            PluginId::DynamicFeature => "com.android.dynamic-feature",
            PluginId::KotlinAndroid => "org.jetbrains.kotlin.android",
            PluginId::Other(id) => id,
        }
    }

    /// Parse a plugin id, falling back to [`PluginId::Other`].
    pub fn from_id(id: &str) -> Self {
        match id.trim() {
            "com.android.library" => PluginId::Library,
            "com.android.application" => PluginId::Application,
            "com.android.test" => PluginId::Test,
            "com.android.dynamic-feature" => PluginId::DynamicFeature,
            "org.jetbrains.kotlin.android" | "kotlin-android" => PluginId::KotlinAndroid,
            other => PluginId::Other(other.to_string()),
        }
    }

    /// The capability a component plugin declares, if any.
    fn component_capability(&self) -> Option<Capability> {
        match self {
            PluginId::Library => Some(Capability::Library),
            PluginId::Application => Some(Capability::Application),
            PluginId::Test | PluginId::DynamicFeature => Some(Capability::Base),
            PluginId::KotlinAndroid | PluginId::Other(_) => None,
        }
    }

    /// Apply this plugin to a module.
    pub fn apply(&self, module: &mut Module) -> Result<(), ExtensionError> {
        if let Some(capability) = self.component_capability() {
            apply_component(module, capability)?;
        } else if *self == PluginId::KotlinAndroid {
            apply_toolchain(module);
        } else {
            tracing::debug!("plugin `{}` contributes nothing to {}", self, module.path());
        }
        Ok(())
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PluginId::from_id(s))
    }
}

impl Serialize for PluginId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PluginId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(PluginId::from_id(&s))
    }
}

fn apply_component(module: &mut Module, capability: Capability) -> Result<(), ExtensionError> {
    let settings = module.settings().clone();
    let component = module.component_or_insert(PackagedComponentExtension::base);
    component.add_capability(Capability::Base);
    component.add_capability(capability);

    if component.is_finalized() {
        return Ok(());
    }
    if let Some(namespace) = settings.namespace {
        component.set_namespace(namespace)?;
    }
    if let Some(level) = settings.compile_sdk {
        component.set_compile_sdk(level)?;
    }
    if let (Some(source), Some(target)) =
        (settings.source_compatibility, settings.target_compatibility)
    {
        component.set_compatibility(source, target)?;
    } else if let Some(level) = settings
        .source_compatibility
        .or(settings.target_compatibility)
    {
        component.set_compatibility(level, level)?;
    }
    if settings.finalized {
        component.finalize();
    }
    Ok(())
}

fn apply_toolchain(module: &mut Module) {
    let jvm_target = module.settings().toolchain_jvm_target;
    module.set_toolchain(ToolchainExtension { jvm_target });
    for variant in BUILD_VARIANTS {
        module.register_task(Task::toolchain_compile(
            format!("compile{}Kotlin", variant),
            jvm_target,
        ));
    }
}

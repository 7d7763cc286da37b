//! Extensions that plugins attach to a module.
//!
//! A packaged-component extension is the typed configuration object a
//! component plugin (library, application, ...) attaches during the module's
//! evaluation. It moves through `Unconfigured -> Configuring -> Finalized`;
//! once finalized every setter is rejected with [`ExtensionError::Finalized`].
//! Callers that treat finalization as benign query [`is_finalized`] first.
//!
//! [`is_finalized`]: PackagedComponentExtension::is_finalized

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::identifier::Identifier;

/// Error raised when mutating an extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("cannot set `{property}`: extension has already been finalized")]
    Finalized { property: &'static str },
}

/// Lifecycle state of an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionState {
    /// Attached but not touched by its plugin yet
    #[default]
    Unconfigured,
    /// Plugin or build script is still configuring it
    Configuring,
    /// Locked by the engine; all mutation is rejected
    Finalized,
}

/// A capability a component plugin declares on its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Generic packaged component: compile options and SDK level
    Base,
    /// Library component: additionally owns a namespace
    Library,
    /// Application component
    Application,
}

/// Variant of a packaged component, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Library,
    Application,
    Base,
}

impl Variant {
    /// Get the variant name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Library => "library",
            Variant::Application => "application",
            Variant::Base => "base",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A managed-runtime (JVM) language level.
///
/// Levels up to 8 are written `1.N`, later levels as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JvmVersion(u16);

impl JvmVersion {
    pub const VERSION_1_8: JvmVersion = JvmVersion(8);
    pub const VERSION_11: JvmVersion = JvmVersion(11);
    pub const VERSION_17: JvmVersion = JvmVersion(17);
}

impl fmt::Display for JvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Error returned when parsing an invalid JVM version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JVM version '{0}', expected e.g. 1.8, 11 or 17")]
pub struct JvmVersionParseError(pub String);

impl FromStr for JvmVersion {
    type Err = JvmVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // `1.N` only names levels up to 8; later levels are bare numbers.
        let parsed = match trimmed.strip_prefix("1.") {
            Some(digits) => digits.parse::<u16>().ok().filter(|n| (1..=8).contains(n)),
            None => trimmed.parse::<u16>().ok().filter(|n| *n >= 8),
        };
        parsed
            .map(JvmVersion)
            .ok_or_else(|| JvmVersionParseError(s.to_string()))
    }
}

impl Serialize for JvmVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JvmVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Source/target compatibility levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    pub source_compatibility: Option<JvmVersion>,
    pub target_compatibility: Option<JvmVersion>,
}

/// The packaged-component extension (`android { ... }` in a module's build script).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackagedComponentExtension {
    capabilities: BTreeSet<Capability>,
    namespace: Option<Identifier>,
    compile_sdk: Option<u32>,
    compile_options: CompileOptions,
    state: ExtensionState,
}

impl PackagedComponentExtension {
    /// Create an unconfigured extension declaring the given capabilities.
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        PackagedComponentExtension {
            capabilities: capabilities.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Extension contributed by a library plugin.
    pub fn library() -> Self {
        Self::new([Capability::Base, Capability::Library])
    }

    /// Extension contributed by an application plugin.
    pub fn application() -> Self {
        Self::new([Capability::Base, Capability::Application])
    }

    /// Extension contributed by any other component plugin.
    pub fn base() -> Self {
        Self::new([Capability::Base])
    }

    /// Declare an additional capability (a second component plugin applied).
    pub fn add_capability(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn namespace(&self) -> Option<&Identifier> {
        self.namespace.as_ref()
    }

    pub fn compile_sdk(&self) -> Option<u32> {
        self.compile_sdk
    }

    pub fn compile_options(&self) -> &CompileOptions {
        &self.compile_options
    }

    pub fn state(&self) -> ExtensionState {
        self.state
    }

    /// Check whether the engine has locked this extension.
    pub fn is_finalized(&self) -> bool {
        self.state == ExtensionState::Finalized
    }

    /// Set the namespace.
    pub fn set_namespace(&mut self, namespace: Identifier) -> Result<(), ExtensionError> {
        self.check_mutable("namespace")?;
        self.namespace = Some(namespace);
        Ok(())
    }

    /// Set the compile SDK level.
    pub fn set_compile_sdk(&mut self, level: u32) -> Result<(), ExtensionError> {
        self.check_mutable("compileSdk")?;
        self.compile_sdk = Some(level);
        Ok(())
    }

    /// Set both source and target compatibility.
    pub fn set_compatibility(
        &mut self,
        source: JvmVersion,
        target: JvmVersion,
    ) -> Result<(), ExtensionError> {
        self.check_mutable("compileOptions")?;
        self.compile_options = CompileOptions {
            source_compatibility: Some(source),
            target_compatibility: Some(target),
        };
        Ok(())
    }

    /// Mark the extension as being configured.
    pub fn begin_configuring(&mut self) {
        if self.state == ExtensionState::Unconfigured {
            self.state = ExtensionState::Configuring;
        }
    }

    /// Lock the extension. Idempotent.
    pub fn finalize(&mut self) {
        self.state = ExtensionState::Finalized;
    }

    fn check_mutable(&mut self, property: &'static str) -> Result<(), ExtensionError> {
        if self.is_finalized() {
            return Err(ExtensionError::Finalized { property });
        }
        self.begin_configuring();
        Ok(())
    }
}

/// The language-toolchain project extension (`kotlin { compilerOptions { ... } }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolchainExtension {
    pub jvm_target: Option<JvmVersion>,
}

//! Configuration file support for Harmony.
//!
//! Harmony supports two configuration file locations:
//! - Global: `~/.harmony/config.toml` - User-wide defaults
//! - Project: `.harmony/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! [harmonize]
//! jvm-target = "11"
//! compile-sdk = 35
//! descriptor = "src/main/AndroidManifest.xml"
//!
//! [[pin]]
//! group = "org.jetbrains.kotlin"
//! name = "kotlin-stdlib"
//! version = "1.9.22"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::coordinate::Coordinate;
use crate::core::extension::JvmVersion;
use crate::harmonize::HarmonizeOptions;
use crate::resolver::VersionPin;

/// Harmony configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Harmonization levels
    pub harmonize: HarmonizeConfig,

    /// Version pins, installed after the default stdlib pin
    #[serde(rename = "pin")]
    pub pins: Vec<PinConfig>,
}

/// Harmonization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HarmonizeConfig {
    /// JVM level for compile options and toolchain targets
    pub jvm_target: Option<JvmVersion>,

    /// Compile SDK level forced on library modules
    pub compile_sdk: Option<u32>,

    /// Descriptor path relative to each module root
    pub descriptor: Option<PathBuf>,
}

/// One `[[pin]]` entry.
///
/// `version` is a Maven version string and is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl From<&PinConfig> for VersionPin {
    fn from(pin: &PinConfig) -> Self {
        VersionPin::new(Coordinate::new(&pin.group, &pin.name), pin.version.clone())
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.harmonize.jvm_target.is_some() {
            self.harmonize.jvm_target = other.harmonize.jvm_target;
        }
        if other.harmonize.compile_sdk.is_some() {
            self.harmonize.compile_sdk = other.harmonize.compile_sdk;
        }
        if other.harmonize.descriptor.is_some() {
            self.harmonize.descriptor = other.harmonize.descriptor;
        }

        // Pins are replaced as a whole, not merged entry by entry
        if !other.pins.is_empty() {
            self.pins = other.pins;
        }
    }

    /// Build harmonization options, filling in defaults.
    pub fn harmonize_options(&self) -> HarmonizeOptions {
        let mut options = HarmonizeOptions::default();
        if let Some(level) = self.harmonize.jvm_target {
            options.jvm_target = level;
        }
        if let Some(level) = self.harmonize.compile_sdk {
            options.compile_sdk = level;
        }
        if let Some(descriptor) = &self.harmonize.descriptor {
            options.descriptor = descriptor.clone();
        }
        // Later rules win, so a configured stdlib pin overrides the default one.
        options.pins.extend(self.pins.iter().map(VersionPin::from));
        options
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.harmony/config.toml)
/// 2. Global config (~/.harmony/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global harmony config directory (~/.harmony).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".harmony"))
}

/// Get the project config path (.harmony/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".harmony").join("config.toml")
}

//! Global context for Harmony operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations and output preferences.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::{find_manifest as ws_find_manifest, ManifestError};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Harmony data (~/.harmony/)
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(".harmony"));

        Ok(GlobalContext {
            cwd,
            home,
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different home directory for global configuration.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Harmony home directory (~/.harmony/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Harmony.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            match ws_find_manifest(&current) {
                Ok(path) => return Ok(path),
                Err(ManifestError::NotFound { .. }) => {
                    if !current.pop() {
                        return Err(ManifestError::NotFound {
                            dir: self.cwd.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self, project_root: &Path) -> Config {
        config::load_config(&self.config_path(), &config::project_config_path(project_root))
    }
}

//! Workspace - the project root and its manifest.
//!
//! A Workspace ties a loaded Harmony.toml to the directory it lives in and
//! builds the live [`Project`] from it.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::manifest::Manifest;
use crate::core::project::Project;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Harmony.toml";

/// Default unified build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Errors locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Harmony.toml` in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },
}

/// Find the manifest in a directory.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = dir.join(MANIFEST_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// A loaded project workspace.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Load a workspace from a manifest path.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Workspace { root, manifest })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get the unified build directory.
    pub fn build_dir(&self) -> PathBuf {
        let dir = self
            .manifest
            .project
            .build_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_BUILD_DIR));
        self.root.join(dir)
    }

    /// Build the unevaluated project graph.
    pub fn to_project(&self) -> Result<Project> {
        let mut project =
            Project::new(self.manifest.name(), &self.root).with_build_dir(self.build_dir());
        for decl in &self.manifest.modules {
            project.add_module(self.manifest.to_module(decl, &self.root)?)?;
        }
        if let Some(anchor) = &self.manifest.project.evaluation_anchor {
            project.set_evaluation_anchor(anchor)?;
        }
        Ok(project)
    }
}

//! Test utilities for Harmony unit tests.
//!
//! Helpers for laying out module directories and descriptor files on disk,
//! plus fixtures that write complete `Harmony.toml` projects.
//!
//! # Example
//!
//! ```rust,ignore
//! use harmony::test_support::{ProjectFixture, ModuleFixture};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     ProjectFixture::new("android")
//!         .module(ModuleFixture::library("lib-a", "com.example"))
//!         .write(tmp.path());
//! }
//! ```

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use crate::harmonize::DEFAULT_DESCRIPTOR;

pub use fixtures::*;

/// Path of the descriptor file under a module root.
pub fn descriptor_path(module_root: &Path) -> PathBuf {
    module_root.join(DEFAULT_DESCRIPTOR)
}

/// Write a descriptor file under a module root, creating directories.
pub fn write_descriptor(module_root: &Path, content: &str) -> PathBuf {
    let path = descriptor_path(module_root);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Read the descriptor file under a module root.
pub fn read_descriptor(module_root: &Path) -> String {
    fs::read_to_string(descriptor_path(module_root)).unwrap()
}

/// Mark a file read-only.
///
/// Returns `false` when the file still opens for writing afterwards, which
/// happens when tests run with elevated privileges.
pub fn make_readonly(path: &Path) -> bool {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms).unwrap();
    fs::OpenOptions::new().write(true).open(path).is_err()
}

//! Harmonization error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::extension::ExtensionError;

/// Fatal error raised by a harmonization pass.
///
/// Benign conditions (no extension, no descriptor, finalized extension during
/// alignment) never produce one of these.
#[derive(Debug, Error)]
pub enum HarmonizeError {
    #[error("failed to assign namespace `{namespace}` to {module}")]
    Namespace {
        module: String,
        namespace: String,
        #[source]
        source: ExtensionError,
    },

    #[error("failed to read descriptor: {}", .path.display())]
    ReadDescriptor {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write descriptor: {}", .path.display())]
    WriteDescriptor {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Extension(#[from] ExtensionError),
}

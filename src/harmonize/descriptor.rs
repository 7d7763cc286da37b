//! Descriptor sanitizer - drop stale `package="..."` declarations.
//!
//! Once a library module has a centrally assigned namespace, a `package`
//! attribute left in its manifest descriptor conflicts with it at packaging
//! time. The rewrite is a single regex substitution: the attribute name, the
//! `=`, the quoted value and any whitespace following the value are removed;
//! every other byte is preserved.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::harmonize::errors::HarmonizeError;

static PACKAGE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"package\s*=\s*"[^"]*"\s*"#).unwrap());

/// What the sanitizer did to a descriptor file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DescriptorOutcome {
    /// No descriptor at the expected path
    Missing,
    /// Descriptor has no package declaration
    Unchanged,
    /// Package declarations were removed (`written` is false on a dry run)
    Stripped { removed: usize, written: bool },
}

/// Count package declarations in descriptor content.
pub fn count_package_attributes(content: &str) -> usize {
    PACKAGE_ATTRIBUTE.find_iter(content).count()
}

/// Remove every package declaration from descriptor content.
pub fn strip_package_attributes(content: &str) -> Cow<'_, str> {
    PACKAGE_ATTRIBUTE.replace_all(content, "")
}

/// Sanitize the descriptor at `path`.
///
/// A missing file or a file without a package declaration is left alone. When
/// `write` is false the rewrite is computed but not persisted.
pub fn sanitize_descriptor(path: &Path, write: bool) -> Result<DescriptorOutcome, HarmonizeError> {
    if !path.exists() {
        tracing::debug!("no descriptor at {}", path.display());
        return Ok(DescriptorOutcome::Missing);
    }

    let content = fs::read_to_string(path).map_err(|source| HarmonizeError::ReadDescriptor {
        path: path.to_path_buf(),
        source,
    })?;

    let removed = count_package_attributes(&content);
    if removed == 0 {
        return Ok(DescriptorOutcome::Unchanged);
    }

    if write {
        let stripped = strip_package_attributes(&content);
        fs::write(path, stripped.as_bytes()).map_err(|source| {
            HarmonizeError::WriteDescriptor {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            "removed {} package declaration(s) from {}",
            removed,
            path.display()
        );
    }

    Ok(DescriptorOutcome::Stripped {
        removed,
        written: write,
    })
}

//! Namespace identifiers - the dotted package name of a library module.
//!
//! An identifier inferred from a module's `(group, name)` replaces every `-`
//! with `_` in both halves and joins them with a dot. Empty halves are not
//! rejected: they produce a leading or trailing dot, which callers can detect
//! through [`Identifier::is_well_formed`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dotted package identifier (e.g. `com.example.lib_a`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an identifier that was declared verbatim (no sanitization).
    pub fn new(value: impl Into<String>) -> Self {
        Identifier(value.into())
    }

    /// Infer an identifier from a module's group and name.
    pub fn infer(group: &str, name: &str) -> Self {
        Identifier(format!("{}.{}", sanitize(group), sanitize(name)))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that no dotted segment is empty.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.split('.').all(|segment| !segment.is_empty())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::new(value)
    }
}

/// Replace every `-` with `_`.
pub fn sanitize(segment: &str) -> String {
    segment.replace('-', "_")
}

//! Dependency coordinates in `group:name[:version]` notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a coordinate string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("invalid coordinate `{0}`, expected `group:name:version`")]
    Malformed(String),

    #[error("coordinate `{0}` has an empty {1}")]
    EmptyPart(String, &'static str),
}

/// A library coordinate without a version (`group:name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Coordinate {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Check whether a `(group, name)` pair names this coordinate.
    pub fn matches(&self, group: &str, name: &str) -> bool {
        self.group == group && self.name == name
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), None) => {
                check_part(s, group, "group")?;
                check_part(s, name, "name")?;
                Ok(Coordinate::new(group, name))
            }
            _ => Err(CoordinateError::Malformed(s.to_string())),
        }
    }
}

/// A dependency as requested by a module or one of its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyRequest {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl DependencyRequest {
    /// Create a new dependency request.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        DependencyRequest {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The requested coordinate without its version.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group, &self.name)
    }
}

impl fmt::Display for DependencyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for DependencyRequest {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [group, name, version] = parts.as_slice() else {
            return Err(CoordinateError::Malformed(s.to_string()));
        };
        check_part(s, group, "group")?;
        check_part(s, name, "name")?;
        check_part(s, version, "version")?;
        Ok(DependencyRequest::new(*group, *name, *version))
    }
}

fn check_part(full: &str, part: &str, what: &'static str) -> Result<(), CoordinateError> {
    if part.trim().is_empty() {
        return Err(CoordinateError::EmptyPart(full.to_string(), what));
    }
    Ok(())
}

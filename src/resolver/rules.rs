//! Dependency resolution rules.
//!
//! A [`ResolutionRules`] table is created once per run and passed to whoever
//! installs or consults rules. It is append-only: rules are installed per
//! module and never removed. Resolving a request applies the rules installed
//! for the requesting module in installation order, so the last matching rule
//! decides the version.

use serde::{Deserialize, Serialize};

use crate::core::coordinate::{Coordinate, DependencyRequest};

/// Default pinned foundation library.
pub const KOTLIN_STDLIB_GROUP: &str = "org.jetbrains.kotlin";
pub const KOTLIN_STDLIB_NAME: &str = "kotlin-stdlib";
pub const KOTLIN_STDLIB_VERSION: &str = "1.9.22";

/// Force every resolution of `coordinate` to `version`.
///
/// Versions are opaque Maven version strings (`1.9.22`, `33.0`,
/// `1.0.0.Final`); they are forced verbatim and never compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionPin {
    pub coordinate: Coordinate,
    pub version: String,
}

impl VersionPin {
    /// Create a new version pin.
    pub fn new(coordinate: Coordinate, version: impl Into<String>) -> Self {
        VersionPin {
            coordinate,
            version: version.into(),
        }
    }

    /// The default pin: `org.jetbrains.kotlin:kotlin-stdlib` at 1.9.22.
    pub fn kotlin_stdlib() -> Self {
        VersionPin::new(
            Coordinate::new(KOTLIN_STDLIB_GROUP, KOTLIN_STDLIB_NAME),
            KOTLIN_STDLIB_VERSION,
        )
    }

    /// The version this pin forces for `request`, if it applies.
    pub fn select(&self, request: &DependencyRequest) -> Option<&str> {
        self.coordinate
            .matches(&request.group, &request.name)
            .then_some(self.version.as_str())
    }
}

/// A request together with the version selected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub requested: DependencyRequest,
    pub version: String,
    /// A rule overrode the requested version
    pub forced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InstalledRule {
    module: String,
    pin: VersionPin,
}

/// Append-only table of resolution rules for one run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRules {
    rules: Vec<InstalledRule>,
}

impl ResolutionRules {
    /// Create an empty rule table.
    pub fn new() -> Self {
        ResolutionRules { rules: Vec::new() }
    }

    /// Install `pin` for resolutions made on behalf of `module`.
    ///
    /// Returns false if the identical rule is already installed for the module.
    pub fn install(&mut self, module: &str, pin: VersionPin) -> bool {
        let rule = InstalledRule {
            module: module.to_string(),
            pin,
        };
        if self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Number of installed rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are installed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The resolution hook: the version forced for `request`, if any.
    pub fn forced_version(&self, module: &str, request: &DependencyRequest) -> Option<&str> {
        self.rules
            .iter()
            .filter(|r| r.module == module)
            .filter_map(|r| r.pin.select(request))
            .last()
    }

    /// Resolve a request made on behalf of `module`.
    pub fn resolve(&self, module: &str, request: &DependencyRequest) -> ResolvedDependency {
        match self.forced_version(module, request) {
            Some(version) => ResolvedDependency {
                requested: request.clone(),
                version: version.to_string(),
                forced: true,
            },
            None => ResolvedDependency {
                requested: request.clone(),
                version: request.version.clone(),
                forced: false,
            },
        }
    }
}

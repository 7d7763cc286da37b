//! Run the harmonization pass over a workspace.
//!
//! ## Usage
//!
//! ```bash
//! harmony apply                  # Harmonize and rewrite descriptors
//! harmony apply --dry-run        # Report only, leave descriptors alone
//! harmony apply --format json    # Machine-readable report
//! ```

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::core::workspace::Workspace;
use crate::harmonize::{
    DescriptorOutcome, Harmonizer, ModuleReport, NamespaceOutcome, Step,
};
use crate::resolver::{resolve_project, ResolutionRules, ResolvedDependency};
use crate::util::config::Config;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid output format '{0}', valid values: human, json")]
pub struct OutputFormatParseError(pub String);

/// Options for `harmony apply`.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Compute everything but do not rewrite descriptor files
    pub dry_run: bool,
}

/// Selected versions for one module's declared dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleResolutions {
    pub module: String,
    pub dependencies: Vec<ResolvedDependency>,
}

/// Result of a harmonization run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    pub project: String,
    pub dry_run: bool,
    pub evaluation_order: Vec<String>,
    /// Number of resolution rules installed
    pub rules: usize,
    pub modules: Vec<ModuleReport>,
    pub resolutions: Vec<ModuleResolutions>,
}

impl ApplyResult {
    /// Get the report for a module.
    pub fn module(&self, name: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|r| r.module == name)
    }

    /// Number of modules that received a new namespace.
    pub fn assigned_count(&self) -> usize {
        self.modules
            .iter()
            .filter(|r| r.namespace.is_assigned())
            .count()
    }
}

/// Harmonize every module of the workspace.
///
/// Builds the project, registers the pass for every module, then evaluates
/// the project so the deferred passes fire in evaluation order.
pub fn apply(ws: &Workspace, config: &Config, opts: &ApplyOptions) -> Result<ApplyResult> {
    let mut options = config.harmonize_options();
    options.write_descriptors = !opts.dry_run;

    let mut project = ws.to_project()?;
    let mut rules = ResolutionRules::new();
    let harmonizer = Harmonizer::new(options);
    harmonizer.register(&mut project, &mut rules)?;

    let evaluation_order = project.evaluation_order()?;
    tracing::debug!("evaluation order: {}", evaluation_order.join(", "));
    project.evaluate_all()?;

    let resolutions = resolve_project(&project, &rules)
        .into_iter()
        .map(|(module, dependencies)| ModuleResolutions {
            module,
            dependencies,
        })
        .collect();

    let result = ApplyResult {
        project: project.name().to_string(),
        dry_run: opts.dry_run,
        evaluation_order,
        rules: rules.len(),
        modules: harmonizer.reports(),
        resolutions,
    };
    tracing::info!(
        "harmonized {} modules ({} namespaces assigned)",
        result.modules.len(),
        result.assigned_count()
    );
    Ok(result)
}

fn step_label(step: Step) -> &'static str {
    match step {
        Step::Applied => "aligned",
        Step::SkippedFinalized => "skipped (finalized)",
        Step::NotApplicable => "n/a",
    }
}

/// Format an apply result for terminal output.
pub fn format_result(result: &ApplyResult) -> String {
    let mut output = String::new();

    let suffix = if result.dry_run { " (dry run)" } else { "" };
    writeln!(output, "Harmonize: {}{}", result.project, suffix).unwrap();
    writeln!(output, "{}", "=".repeat(50)).unwrap();

    for report in &result.modules {
        let variant = report.variant.map_or("none", |v| v.as_str());
        writeln!(output).unwrap();
        writeln!(output, "  {} [{}]", report.module, variant).unwrap();

        let namespace = match &report.namespace {
            NamespaceOutcome::Assigned(id) => format!("{} (assigned)", id),
            NamespaceOutcome::Kept(id) => format!("{} (kept)", id),
            NamespaceOutcome::NotApplicable => "n/a".to_string(),
        };
        writeln!(output, "      namespace:       {}", namespace).unwrap();

        if let Some(descriptor) = &report.descriptor {
            let status = match descriptor {
                DescriptorOutcome::Missing => "missing".to_string(),
                DescriptorOutcome::Unchanged => "unchanged".to_string(),
                DescriptorOutcome::Stripped { removed, written } => {
                    let verb = if *written { "stripped" } else { "would strip" };
                    format!("{} {} package declaration(s)", verb, removed)
                }
            };
            writeln!(output, "      descriptor:      {}", status).unwrap();
        }

        let alignment = &report.alignment;
        writeln!(
            output,
            "      compile options: {}",
            step_label(alignment.compile_options)
        )
        .unwrap();
        writeln!(output, "      compile sdk:     {}", step_label(alignment.compile_sdk)).unwrap();
        writeln!(
            output,
            "      toolchain:       {} ({} tasks)",
            step_label(alignment.toolchain_extension),
            alignment.toolchain_tasks
        )
        .unwrap();
    }

    let forced: Vec<_> = result
        .resolutions
        .iter()
        .flat_map(|r| r.dependencies.iter().map(move |d| (&r.module, d)))
        .filter(|(_, d)| d.forced)
        .collect();
    if !forced.is_empty() {
        writeln!(output, "\nPinned:").unwrap();
        for (module, dep) in forced {
            writeln!(
                output,
                "  {}: {}:{} {} -> {}",
                module, dep.requested.group, dep.requested.name, dep.requested.version, dep.version
            )
            .unwrap();
        }
    }

    output
}

/// Format an apply result as JSON.
pub fn format_result_json(result: &ApplyResult) -> String {
    serde_json::to_string_pretty(result)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize result: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MANIFEST_NAME;
    use crate::test_support::{read_descriptor, ModuleFixture, ProjectFixture};
    use tempfile::TempDir;

    fn load(tmp: &TempDir) -> Workspace {
        Workspace::new(&tmp.path().join(MANIFEST_NAME)).unwrap()
    }

    #[test]
    fn test_apply_library_and_app() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::library_and_app().write(tmp.path());
        let ws = load(&tmp);

        let result = apply(&ws, &Config::default(), &ApplyOptions::default()).unwrap();
        assert_eq!(result.project, "android");
        assert_eq!(result.evaluation_order, vec!["lib-a", "app-b"]);
        assert_eq!(result.rules, 2);
        assert_eq!(result.assigned_count(), 1);

        let lib = result.module("lib-a").unwrap();
        assert_eq!(
            lib.namespace,
            NamespaceOutcome::Assigned("com.example.lib_a".into())
        );
        assert_eq!(
            read_descriptor(&tmp.path().join("lib-a")),
            "<manifest > <A/> </manifest>"
        );

        let app = result.module("app-b").unwrap();
        assert_eq!(app.namespace, NamespaceOutcome::NotApplicable);

        let lib_deps = &result.resolutions[0];
        assert_eq!(lib_deps.module, "lib-a");
        assert_eq!(lib_deps.dependencies[0].version, "1.9.22");
        assert!(lib_deps.dependencies[0].forced);
    }

    #[test]
    fn test_apply_dry_run() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::library_and_app().write(tmp.path());
        let ws = load(&tmp);

        let result = apply(&ws, &Config::default(), &ApplyOptions { dry_run: true }).unwrap();
        assert!(result.dry_run);
        assert_eq!(
            read_descriptor(&tmp.path().join("lib-a")),
            "<manifest package=\"com.x.y\"> <A/> </manifest>"
        );
        assert!(format_result(&result).contains("would strip 1 package declaration(s)"));
    }

    #[test]
    fn test_apply_twice_matches_once() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::library_and_app().write(tmp.path());
        let ws = load(&tmp);

        apply(&ws, &Config::default(), &ApplyOptions::default()).unwrap();
        let descriptor = read_descriptor(&tmp.path().join("lib-a"));
        let second = apply(&ws, &Config::default(), &ApplyOptions::default()).unwrap();

        // Descriptor is already clean, so the second run finds nothing to strip.
        assert_eq!(read_descriptor(&tmp.path().join("lib-a")), descriptor);
        assert_eq!(
            second.module("lib-a").unwrap().descriptor,
            Some(DescriptorOutcome::Unchanged)
        );
    }

    #[test]
    fn test_apply_respects_anchor() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::library_and_app()
            .anchor("app-b")
            .write(tmp.path());
        let ws = load(&tmp);

        let result = apply(&ws, &Config::default(), &ApplyOptions::default()).unwrap();
        assert_eq!(result.evaluation_order, vec!["app-b", "lib-a"]);
        assert_eq!(result.modules[0].module, "app-b");
    }

    #[test]
    fn test_apply_with_configured_pins() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::new("android")
            .module(
                ModuleFixture::library("lib-a", "com.example")
                    .dependency("com.squareup.okio:okio:3.2.0")
                    .dependency("org.jetbrains.kotlin:kotlin-stdlib:1.8.0"),
            )
            .write(tmp.path());
        let ws = load(&tmp);

        let config: Config = toml::from_str(
            "[[pin]]\ngroup = \"com.squareup.okio\"\nname = \"okio\"\nversion = \"3.9.0\"\n",
        )
        .unwrap();
        let result = apply(&ws, &config, &ApplyOptions::default()).unwrap();

        let deps = &result.resolutions[0].dependencies;
        assert_eq!(deps[0].version, "3.9.0");
        // Configured pins are installed alongside the default stdlib pin.
        assert_eq!(deps[1].version, "1.9.22");
        assert!(deps[1].forced);
    }

    #[test]
    fn test_format_json() {
        let tmp = TempDir::new().unwrap();
        ProjectFixture::library_and_app().write(tmp.path());
        let ws = load(&tmp);

        let result = apply(&ws, &Config::default(), &ApplyOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&format_result_json(&result)).unwrap();
        assert_eq!(json["project"], "android");
        assert_eq!(json["modules"][0]["namespace"]["status"], "assigned");
        assert_eq!(json["modules"][0]["namespace"]["namespace"], "com.example.lib_a");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("github".parse::<OutputFormat>().is_err());
    }
}

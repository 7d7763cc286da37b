//! Module - one unit of the multi-module project graph.
//!
//! A module starts unevaluated: it knows its identity, the plugins it applies
//! and the settings its build script declares. Evaluation applies the plugins,
//! which attach the packaged-component extension, the toolchain extension and
//! the toolchain compile tasks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::coordinate::DependencyRequest;
use crate::core::extension::{JvmVersion, PackagedComponentExtension, ToolchainExtension};
use crate::core::identifier::Identifier;
use crate::core::plugin::PluginId;

/// Evaluation state of a module, owned by the host project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationState {
    #[default]
    Unevaluated,
    Evaluating,
    Evaluated,
}

/// Settings a module's build script declares for its plugins.
///
/// These are read by the plugins when they are applied; they are never
/// modified by harmonization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSettings {
    pub namespace: Option<Identifier>,
    pub compile_sdk: Option<u32>,
    pub source_compatibility: Option<JvmVersion>,
    pub target_compatibility: Option<JvmVersion>,
    /// The component plugin locks its extension during its own configuration.
    pub finalized: bool,
    pub toolchain_jvm_target: Option<JvmVersion>,
}

/// Kind of a module task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Language-toolchain compilation with its own JVM target
    ToolchainCompile { jvm_target: Option<JvmVersion> },
    Other,
}

/// A task registered on a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub kind: TaskKind,
}

impl Task {
    /// Create a toolchain compile task.
    pub fn toolchain_compile(name: impl Into<String>, jvm_target: Option<JvmVersion>) -> Self {
        Task {
            name: name.into(),
            kind: TaskKind::ToolchainCompile { jvm_target },
        }
    }

    /// Get the JVM target if this is a toolchain compile task.
    pub fn jvm_target(&self) -> Option<JvmVersion> {
        match self.kind {
            TaskKind::ToolchainCompile { jvm_target } => jvm_target,
            TaskKind::Other => None,
        }
    }
}

/// A module in the project graph.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    group: String,
    root: PathBuf,
    build_dir: PathBuf,
    state: EvaluationState,
    plugins: Vec<PluginId>,
    settings: ModuleSettings,
    evaluation_depends_on: Vec<String>,
    dependencies: Vec<DependencyRequest>,
    component: Option<PackagedComponentExtension>,
    toolchain: Option<ToolchainExtension>,
    tasks: Vec<Task>,
}

impl Module {
    /// Create a new unevaluated module.
    pub fn new(name: impl Into<String>, group: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Module {
            name: name.into(),
            group: group.into(),
            build_dir: root.join("build"),
            root,
            state: EvaluationState::Unevaluated,
            plugins: Vec::new(),
            settings: ModuleSettings::default(),
            evaluation_depends_on: Vec::new(),
            dependencies: Vec::new(),
            component: None,
            toolchain: None,
            tasks: Vec::new(),
        }
    }

    /// Apply a plugin when the module is evaluated.
    pub fn with_plugin(mut self, plugin: PluginId) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Set the declared plugin settings.
    pub fn with_settings(mut self, settings: ModuleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Declare a dependency.
    pub fn with_dependency(mut self, request: DependencyRequest) -> Self {
        self.dependencies.push(request);
        self
    }

    /// Require another module to be evaluated before this one.
    pub fn evaluates_after(mut self, module: impl Into<String>) -> Self {
        let module = module.into();
        if !self.evaluation_depends_on.contains(&module) {
            self.evaluation_depends_on.push(module);
        }
        self
    }

    /// Get the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the module group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Get the project path (`:name`).
    pub fn path(&self) -> String {
        format!(":{}", self.name)
    }

    /// Get the module root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the module build output directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Redirect the module build output directory.
    pub fn set_build_dir(&mut self, dir: PathBuf) {
        self.build_dir = dir;
    }

    pub fn state(&self) -> EvaluationState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: EvaluationState) {
        self.state = state;
    }

    /// Check whether the module has finished evaluating.
    pub fn is_evaluated(&self) -> bool {
        self.state == EvaluationState::Evaluated
    }

    pub fn plugins(&self) -> &[PluginId] {
        &self.plugins
    }

    pub fn settings(&self) -> &ModuleSettings {
        &self.settings
    }

    pub fn evaluation_depends_on(&self) -> &[String] {
        &self.evaluation_depends_on
    }

    pub(crate) fn add_evaluation_dependency(&mut self, module: &str) {
        if module != self.name && !self.evaluation_depends_on.iter().any(|m| m == module) {
            self.evaluation_depends_on.push(module.to_string());
        }
    }

    pub fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }

    /// Get the packaged-component extension, if a component plugin attached one.
    pub fn component(&self) -> Option<&PackagedComponentExtension> {
        self.component.as_ref()
    }

    pub fn component_mut(&mut self) -> Option<&mut PackagedComponentExtension> {
        self.component.as_mut()
    }

    pub(crate) fn component_or_insert(
        &mut self,
        make: impl FnOnce() -> PackagedComponentExtension,
    ) -> &mut PackagedComponentExtension {
        self.component.get_or_insert_with(make)
    }

    /// Get the toolchain extension, if the toolchain plugin is applied.
    pub fn toolchain(&self) -> Option<&ToolchainExtension> {
        self.toolchain.as_ref()
    }

    pub fn toolchain_mut(&mut self) -> Option<&mut ToolchainExtension> {
        self.toolchain.as_mut()
    }

    pub(crate) fn set_toolchain(&mut self, toolchain: ToolchainExtension) {
        self.toolchain = Some(toolchain);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Register a task, replacing any task with the same name.
    pub fn register_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.name == task.name) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    /// Iterate over the toolchain compile tasks' JVM targets.
    pub fn toolchain_compile_targets_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Option<JvmVersion>> {
        self.tasks.iter_mut().filter_map(|t| match &mut t.kind {
            TaskKind::ToolchainCompile { jvm_target } => Some(jvm_target),
            TaskKind::Other => None,
        })
    }

    /// Lock every extension of this module.
    pub fn finalize_extensions(&mut self) {
        if let Some(component) = self.component.as_mut() {
            component.finalize();
        }
    }
}

//! Project - the module graph and its evaluation lifecycle.
//!
//! The project owns every module, the "evaluates before" edges between them
//! and the one-shot ready actions registered through [`Project::on_ready`].
//! Evaluating a module evaluates the modules it depends on first, applies its
//! plugins, marks it evaluated and then fires its ready actions in
//! registration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use thiserror::Error;

use crate::core::module::{EvaluationState, Module};

/// Action fired once when a module has finished evaluating.
pub type ReadyAction = Box<dyn FnOnce(&mut Module) -> Result<()>>;

/// Structural errors in the module graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("module `{0}` is already registered")]
    DuplicateModule(String),

    #[error("module `{0}` not found")]
    UnknownModule(String),

    #[error("module `{module}` evaluates after unknown module `{dependency}`")]
    UnknownEvaluationDependency { module: String, dependency: String },

    #[error("evaluation cycle detected involving module `{0}`")]
    EvaluationCycle(String),
}

/// A multi-module project.
pub struct Project {
    name: String,
    root: PathBuf,
    build_dir: PathBuf,
    modules: Vec<Module>,
    index: HashMap<String, usize>,
    ready_actions: HashMap<String, Vec<ReadyAction>>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Project {
            name: name.into(),
            build_dir: root.join("build"),
            root,
            modules: Vec::new(),
            index: HashMap::new(),
            ready_actions: HashMap::new(),
        }
    }

    /// Redirect the unified build directory.
    ///
    /// Every module builds into `<build_dir>/<module name>`.
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        for module in &mut self.modules {
            module.set_build_dir(self.build_dir.join(module.name()));
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the unified build directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Register a module.
    pub fn add_module(&mut self, mut module: Module) -> Result<(), ProjectError> {
        if self.index.contains_key(module.name()) {
            return Err(ProjectError::DuplicateModule(module.name().to_string()));
        }
        module.set_build_dir(self.build_dir.join(module.name()));
        self.index.insert(module.name().to_string(), self.modules.len());
        self.modules.push(module);
        Ok(())
    }

    /// Make every other module evaluate after `anchor`.
    pub fn set_evaluation_anchor(&mut self, anchor: &str) -> Result<(), ProjectError> {
        if !self.index.contains_key(anchor) {
            return Err(ProjectError::UnknownModule(anchor.to_string()));
        }
        for module in &mut self.modules {
            module.add_evaluation_dependency(anchor);
        }
        Ok(())
    }

    /// Get a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    /// Get a mutable module by name.
    pub fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.index.get(name).map(|&i| &mut self.modules[i])
    }

    /// Iterate over modules in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Module names in declaration order.
    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }

    /// Number of ready actions still waiting for their module.
    pub fn pending_actions(&self) -> usize {
        self.ready_actions.values().map(Vec::len).sum()
    }

    /// Run `action` once `module` has been evaluated.
    ///
    /// Fires immediately if the module is already evaluated; otherwise the
    /// action is queued and fired exactly once by [`Project::evaluate`].
    pub fn on_ready(&mut self, module: &str, action: ReadyAction) -> Result<()> {
        let idx = self.index_of(module)?;
        if self.modules[idx].is_evaluated() {
            tracing::trace!("{} already evaluated, running action now", self.modules[idx].path());
            action(&mut self.modules[idx])
        } else {
            tracing::trace!("deferring action until {} is evaluated", self.modules[idx].path());
            self.ready_actions
                .entry(module.to_string())
                .or_default()
                .push(action);
            Ok(())
        }
    }

    /// Evaluate one module, evaluating the modules it depends on first.
    pub fn evaluate(&mut self, name: &str) -> Result<()> {
        let idx = self.index_of(name)?;
        match self.modules[idx].state() {
            EvaluationState::Evaluated => return Ok(()),
            EvaluationState::Evaluating => {
                return Err(ProjectError::EvaluationCycle(name.to_string()).into())
            }
            EvaluationState::Unevaluated => {}
        }

        self.modules[idx].set_state(EvaluationState::Evaluating);
        let depends_on = self.modules[idx].evaluation_depends_on().to_vec();
        for dependency in &depends_on {
            if !self.index.contains_key(dependency) {
                return Err(ProjectError::UnknownEvaluationDependency {
                    module: name.to_string(),
                    dependency: dependency.clone(),
                }
                .into());
            }
            self.evaluate(dependency)?;
        }

        let module = &mut self.modules[idx];
        tracing::debug!("evaluating {}", module.path());
        let plugins = module.plugins().to_vec();
        for plugin in &plugins {
            plugin
                .apply(module)
                .with_context(|| format!("failed to apply plugin `{}` to {}", plugin, module.path()))?;
        }
        module.set_state(EvaluationState::Evaluated);

        let actions = self.ready_actions.remove(name).unwrap_or_default();
        for action in actions {
            action(&mut self.modules[idx])?;
        }
        Ok(())
    }

    /// Evaluate every module in evaluation order.
    pub fn evaluate_all(&mut self) -> Result<()> {
        for name in self.evaluation_order()? {
            self.evaluate(&name)?;
        }
        Ok(())
    }

    /// Lock every module's extensions, as the engine does before task execution.
    pub fn finalize_all(&mut self) {
        for module in &mut self.modules {
            module.finalize_extensions();
        }
    }

    /// Compute the order in which modules evaluate.
    ///
    /// Every module comes after the modules it evaluates after; otherwise
    /// declaration order is kept.
    pub fn evaluation_order(&self) -> Result<Vec<String>, ProjectError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.modules.len()).map(|i| graph.add_node(i)).collect();

        for (i, module) in self.modules.iter().enumerate() {
            for dependency in module.evaluation_depends_on() {
                let Some(&d) = self.index.get(dependency) else {
                    return Err(ProjectError::UnknownEvaluationDependency {
                        module: module.name().to_string(),
                        dependency: dependency.clone(),
                    });
                };
                graph.update_edge(nodes[d], nodes[i], ());
            }
        }

        if let Err(cycle) = petgraph::algo::toposort(&graph, None) {
            let module = &self.modules[graph[cycle.node_id()]];
            return Err(ProjectError::EvaluationCycle(module.name().to_string()));
        }

        let mut in_degree: Vec<usize> = nodes
            .iter()
            .map(|&n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.modules.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(self.modules[i].name().to_string());
            for next in graph.neighbors_directed(nodes[i], Direction::Outgoing) {
                let j = graph[next];
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }
        Ok(order)
    }

    fn index_of(&self, name: &str) -> Result<usize, ProjectError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ProjectError::UnknownModule(name.to_string()))
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("build_dir", &self.build_dir)
            .field("modules", &self.modules)
            .field("pending_actions", &self.pending_actions())
            .finish()
    }
}

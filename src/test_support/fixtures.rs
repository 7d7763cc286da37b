//! Test fixtures for common project layouts.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::MANIFEST_NAME;
use crate::test_support::write_descriptor;

/// Fixture for one `[[module]]` entry.
#[derive(Debug, Clone)]
pub struct ModuleFixture {
    pub name: String,
    pub group: String,
    pub plugins: Vec<String>,
    pub dependencies: Vec<String>,
    /// Extra `key = value` lines for the `[module.android]` table
    pub android: Vec<String>,
    /// Descriptor content written under the module root
    pub descriptor: Option<String>,
}

impl ModuleFixture {
    /// A module with no plugins.
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        ModuleFixture {
            name: name.into(),
            group: group.into(),
            plugins: Vec::new(),
            dependencies: Vec::new(),
            android: Vec::new(),
            descriptor: None,
        }
    }

    /// A Kotlin library module that declares nothing about its namespace.
    pub fn library(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::new(name, group)
            .plugin("com.android.library")
            .plugin("kotlin-android")
    }

    /// An application module with a declared namespace.
    pub fn application(
        name: impl Into<String>,
        group: impl Into<String>,
        namespace: &str,
    ) -> Self {
        Self::new(name, group)
            .plugin("com.android.application")
            .android(format!("namespace = \"{}\"", namespace))
    }

    pub fn plugin(mut self, id: &str) -> Self {
        self.plugins.push(id.to_string());
        self
    }

    pub fn dependency(mut self, coordinate: &str) -> Self {
        self.dependencies.push(coordinate.to_string());
        self
    }

    pub fn android(mut self, line: impl Into<String>) -> Self {
        self.android.push(line.into());
        self
    }

    pub fn descriptor(mut self, content: &str) -> Self {
        self.descriptor = Some(content.to_string());
        self
    }

    fn to_toml(&self) -> String {
        let mut out = String::new();
        let quoted = |items: &[String]| {
            items
                .iter()
                .map(|s| format!("\"{}\"", s))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(out, "[[module]]").unwrap();
        writeln!(out, "name = \"{}\"", self.name).unwrap();
        writeln!(out, "group = \"{}\"", self.group).unwrap();
        writeln!(out, "plugins = [{}]", quoted(&self.plugins)).unwrap();
        writeln!(out, "dependencies = [{}]", quoted(&self.dependencies)).unwrap();
        if !self.android.is_empty() {
            writeln!(out, "\n[module.android]").unwrap();
            for line in &self.android {
                writeln!(out, "{}", line).unwrap();
            }
        }
        out
    }
}

/// Fixture for a complete project.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub name: String,
    pub build_dir: Option<String>,
    pub anchor: Option<String>,
    pub modules: Vec<ModuleFixture>,
}

impl ProjectFixture {
    /// Create an empty project fixture.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectFixture {
            name: name.into(),
            build_dir: None,
            anchor: None,
            modules: Vec::new(),
        }
    }

    /// The two-module layout used by the end-to-end scenarios.
    pub fn library_and_app() -> Self {
        Self::new("android")
            .module(
                ModuleFixture::library("lib-a", "com.example")
                    .dependency("org.jetbrains.kotlin:kotlin-stdlib:1.8.0")
                    .descriptor("<manifest package=\"com.x.y\"> <A/> </manifest>"),
            )
            .module(ModuleFixture::application(
                "app-b",
                "com.example",
                "com.example.app",
            ))
    }

    pub fn build_dir(mut self, dir: &str) -> Self {
        self.build_dir = Some(dir.to_string());
        self
    }

    pub fn anchor(mut self, module: &str) -> Self {
        self.anchor = Some(module.to_string());
        self
    }

    pub fn module(mut self, module: ModuleFixture) -> Self {
        self.modules.push(module);
        self
    }

    /// Render the `Harmony.toml` content.
    pub fn manifest(&self) -> String {
        let mut out = String::new();
        writeln!(out, "[project]").unwrap();
        writeln!(out, "name = \"{}\"", self.name).unwrap();
        if let Some(dir) = &self.build_dir {
            writeln!(out, "build-dir = \"{}\"", dir).unwrap();
        }
        if let Some(anchor) = &self.anchor {
            writeln!(out, "evaluation-anchor = \"{}\"", anchor).unwrap();
        }
        for module in &self.modules {
            writeln!(out).unwrap();
            out.push_str(&module.to_toml());
        }
        out
    }

    /// Write the manifest and module directories under `root`.
    pub fn write(&self, root: &Path) {
        fs::create_dir_all(root).unwrap();
        fs::write(root.join(MANIFEST_NAME), self.manifest()).unwrap();
        for module in &self.modules {
            let module_root = root.join(&module.name);
            fs::create_dir_all(&module_root).unwrap();
            if let Some(descriptor) = &module.descriptor {
                write_descriptor(&module_root, descriptor);
            }
        }
    }
}

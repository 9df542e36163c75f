//! The normalized project model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use projson_frameworks::Framework;
use serde::Serialize;

use crate::compiler_options::CompilerOptions;
use crate::dependency::LibraryRange;
use crate::target_framework::TargetFrameworkInfo;
use crate::version::{FileVersion, Version};

/// A fully read project descriptor. Immutable once returned by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    /// Absolute path of the descriptor file.
    pub project_file_path: PathBuf,
    pub version: Version,
    pub assembly_file_version: FileVersion,

    pub description: Option<String>,
    pub summary: Option<String>,
    pub copyright: Option<String>,
    pub title: Option<String>,
    pub web_root: Option<String>,
    pub entry_point: Option<String>,
    pub project_url: Option<String>,
    pub license_url: Option<String>,
    pub icon_url: Option<String>,
    pub language: Option<String>,
    pub release_notes: Option<String>,

    pub authors: Vec<String>,
    pub owners: Vec<String>,
    pub tags: Vec<String>,

    pub require_license_acceptance: bool,
    pub is_loadable: bool,
    pub embed_interop_types: bool,

    pub commands: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, Vec<String>>,

    pub dependencies: Vec<LibraryRange>,

    /// Root-level `compilationOptions`; empty when the descriptor has none.
    pub default_compiler_options: CompilerOptions,
    pub compiler_options_by_configuration: BTreeMap<String, CompilerOptions>,
    pub compiler_options_by_framework: BTreeMap<Framework, CompilerOptions>,
    pub target_frameworks: BTreeMap<Framework, TargetFrameworkInfo>,
}

impl Project {
    /// Directory containing the descriptor.
    pub fn project_directory(&self) -> &Path {
        self.project_file_path.parent().unwrap_or(Path::new(""))
    }

    /// Effective options for a configuration, optionally narrowed to a
    /// framework: defaults, then the configuration, then the framework.
    pub fn compiler_options(&self, configuration: &str, framework: Option<&Framework>) -> CompilerOptions {
        let layers = [
            Some(&self.default_compiler_options),
            self.compiler_options_by_configuration.get(configuration),
            framework.and_then(|fw| self.compiler_options_by_framework.get(fw)),
        ];
        CompilerOptions::combine(layers.into_iter().flatten())
    }

    pub fn target_framework(&self, framework: &Framework) -> Option<&TargetFrameworkInfo> {
        self.target_frameworks.get(framework)
    }

    pub fn frameworks(&self) -> impl Iterator<Item = &Framework> {
        self.target_frameworks.keys()
    }

    pub fn configurations(&self) -> impl Iterator<Item = &str> {
        self.compiler_options_by_configuration.keys().map(String::as_str)
    }
}

//! Reads a descriptor into a [`Project`].
//!
//! A single linear pass: metadata, version, file version, string lists,
//! commands, scripts, configurations and frameworks, then top-level
//! dependencies. The first fatal problem aborts the read; unsupported
//! frameworks are reported as diagnostics and skipped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use projson_frameworks::Framework;
use projson_tree::{JsonObject, JsonValue, TreeError};

use crate::compiler_options::{read_compiler_options, CompilerOptions};
use crate::dependency::populate_dependencies;
use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
use crate::error::{ErrorKind, ProjectError, Result};
use crate::project::Project;
use crate::settings::ReadSettings;
use crate::target_framework::{build_target_framework, TargetFrameworkInfo};
use crate::version::{default_version, resolve_version, FileVersion, Version};

/// File name of a project descriptor.
pub const PROJECT_FILE_NAME: &str = "project.json";

/// Reads project descriptors with a fixed set of environment inputs.
#[derive(Debug, Clone, Default)]
pub struct ProjectReader {
    settings: ReadSettings,
}

impl ProjectReader {
    pub fn new(settings: ReadSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReadSettings {
        &self.settings
    }

    /// Read the descriptor at `path`, which may be the file itself or the
    /// directory holding it. The project is named after that directory.
    pub fn get_project(&self, path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Result<Project> {
        let file_path = if path.is_dir() {
            path.join(PROJECT_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        let file_path = absolute(&file_path)?;
        let name = file_path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = File::open(&file_path).map_err(|source| ProjectError::Io {
            path: file_path.clone(),
            source,
        })?;
        self.read_project(file, &name, &file_path, diagnostics)
    }

    /// Read a descriptor from `source`. `path` is recorded on the project
    /// and on every error and diagnostic.
    pub fn read_project(
        &self,
        source: impl Read,
        name: &str,
        path: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Project> {
        let path = absolute(path)?;
        let root = projson_tree::read(source).map_err(|e| tree_error(e, &path))?;
        self.build(&root, name, &path, diagnostics)
    }

    /// Read a descriptor held in memory.
    pub fn read_project_str(
        &self,
        text: &str,
        name: &str,
        path: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Project> {
        self.read_project(text.as_bytes(), name, path, diagnostics)
    }

    fn build(
        &self,
        root: &JsonValue,
        name: &str,
        path: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Project> {
        let Some(raw) = root.as_object() else {
            return Err(ProjectError::format(
                ErrorKind::MalformedDescriptor,
                "The JSON file can't be deserialized to a JSON object.",
                path,
                Some(root.position),
            ));
        };
        tracing::debug!(project = name, path = %path.display(), "reading project");

        let version = self.read_version(raw, path)?;
        let assembly_file_version = self.read_file_version(raw, &version, path)?;
        tracing::debug!(%version, %assembly_file_version, "resolved versions");

        let commands = read_commands(raw);
        let scripts = read_scripts(raw, path)?;

        let default_compiler_options = read_compiler_options(raw, path)?.unwrap_or_default();
        let compiler_options_by_configuration = read_configurations(raw, path)?;
        let frameworks = read_frameworks(raw, path, diagnostics)?;

        let mut dependencies = Vec::new();
        populate_dependencies(path, &mut dependencies, raw, "dependencies", false)?;
        tracing::debug!(
            dependencies = dependencies.len(),
            frameworks = frameworks.infos.len(),
            "read project"
        );

        Ok(Project {
            name: name.to_string(),
            project_file_path: path.to_path_buf(),
            version,
            assembly_file_version,
            description: owned(raw.string("description")),
            summary: owned(raw.string("summary")),
            copyright: owned(raw.string("copyright")),
            title: owned(raw.string("title")),
            web_root: owned(raw.string("webroot")),
            entry_point: owned(raw.string("entryPoint")),
            project_url: owned(raw.string("projectUrl")),
            license_url: owned(raw.string("licenseUrl")),
            icon_url: owned(raw.string("iconUrl")),
            language: owned(raw.string("language")),
            release_notes: owned(raw.string("releaseNotes")),
            authors: raw.string_array("authors").unwrap_or_default(),
            owners: raw.string_array("owners").unwrap_or_default(),
            tags: raw.string_array("tags").unwrap_or_default(),
            require_license_acceptance: raw.bool("requireLicenseAcceptance").unwrap_or(false),
            is_loadable: raw.bool("loadable").unwrap_or(true),
            embed_interop_types: raw.bool("embedInteropTypes").unwrap_or(false),
            commands,
            scripts,
            dependencies,
            default_compiler_options,
            compiler_options_by_configuration,
            compiler_options_by_framework: frameworks.options,
            target_frameworks: frameworks.infos,
        })
    }

    fn read_version(&self, raw: &JsonObject, path: &Path) -> Result<Version> {
        let Some(node) = raw.get("version").filter(|v| v.as_str().is_some()) else {
            return Ok(default_version());
        };
        let text = node.as_str().unwrap_or_default();
        resolve_version(text, self.settings.snapshot()).map_err(|e| {
            ProjectError::format(
                ErrorKind::MalformedVersion,
                format!("'{text}' is not a valid version: {e}"),
                path,
                Some(node.position),
            )
        })
    }

    fn read_file_version(&self, raw: &JsonObject, version: &Version, path: &Path) -> Result<FileVersion> {
        let base = FileVersion::from_version(version).ok_or_else(|| {
            ProjectError::format(
                ErrorKind::MalformedVersion,
                format!("'{version}' cannot be expressed as an assembly file version"),
                path,
                raw.get("version").map(|v| v.position),
            )
        })?;
        let Some(text) = self.settings.file_version_override() else {
            return Ok(base);
        };
        base.with_override(text).ok_or_else(|| {
            ProjectError::format(
                ErrorKind::MalformedFileVersion,
                format!("The assembly file version is invalid: {text}"),
                path,
                None,
            )
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tree_error(error: TreeError, path: &Path) -> ProjectError {
    let position = error.position();
    let detail = match error {
        TreeError::Io(source) => {
            return ProjectError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
        TreeError::Syntax { detail, .. } => detail,
        TreeError::UnexpectedEnd { .. } => "unexpected end of input".to_string(),
    };
    ProjectError::format(
        ErrorKind::MalformedDescriptor,
        format!("The JSON file can't be deserialized: {detail}"),
        path,
        position,
    )
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// `commands`: name to command line. Non-string entries are skipped.
fn read_commands(raw: &JsonObject) -> BTreeMap<String, String> {
    let Some(commands) = raw.object("commands") else {
        return BTreeMap::new();
    };
    commands
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.as_str()?.to_string())))
        .collect()
}

/// `scripts`: hook name to one command line or a list of them.
fn read_scripts(raw: &JsonObject, path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let mut scripts = BTreeMap::new();
    let Some(section) = raw.object("scripts") else {
        return Ok(scripts);
    };
    for (name, value) in section.iter() {
        let lines = match (value.as_str(), value.as_string_array()) {
            (Some(line), _) => vec![line.to_string()],
            (None, Some(lines)) => lines,
            (None, None) => {
                return Err(ProjectError::format(
                    ErrorKind::InvalidScriptValue,
                    format!(
                        "The value of a script in {PROJECT_FILE_NAME} can only be a string or an array of strings"
                    ),
                    path,
                    Some(value.position),
                ))
            }
        };
        scripts.insert(name.to_string(), lines);
    }
    Ok(scripts)
}

/// The built-in `Debug` and `Release` configurations, each replaced
/// wholesale by a declared configuration of the same name.
fn read_configurations(raw: &JsonObject, path: &Path) -> Result<BTreeMap<String, CompilerOptions>> {
    let mut configurations = BTreeMap::from([
        ("Debug".to_string(), CompilerOptions::debug()),
        ("Release".to_string(), CompilerOptions::release()),
    ]);
    let Some(section) = raw.object("configurations") else {
        return Ok(configurations);
    };
    for (name, value) in section.iter() {
        let Some(node) = value.as_object() else {
            return Err(ProjectError::format(
                ErrorKind::MalformedDescriptor,
                format!("Configuration '{name}' must be an object."),
                path,
                Some(value.position),
            ));
        };
        let options = read_compiler_options(node, path)?.unwrap_or_default();
        tracing::debug!(configuration = name, "read configuration");
        configurations.insert(name.to_string(), options);
    }
    Ok(configurations)
}

#[derive(Default)]
struct Frameworks {
    options: BTreeMap<Framework, CompilerOptions>,
    infos: BTreeMap<Framework, TargetFrameworkInfo>,
}

fn read_frameworks(
    raw: &JsonObject,
    path: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Frameworks> {
    let mut frameworks = Frameworks::default();
    let Some(section) = raw.object("frameworks") else {
        return Ok(frameworks);
    };

    for (key, value) in section.iter() {
        let context = format!("framework '{key}'");
        let Some(node) = value.as_object() else {
            return Err(ProjectError::format(
                ErrorKind::MalformedDescriptor,
                format!("The value of {context} must be an object."),
                path,
                Some(value.position),
            ));
        };

        let built = build_target_framework(path, key, node)
            .map_err(|e| e.wrap(&context, value.position))?;
        let Some(built) = built else {
            tracing::warn!(framework = key, "skipping unsupported framework");
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnsupportedFramework,
                format!("\"{key}\" is an unsupported framework."),
                path,
                DiagnosticSeverity::Error,
                value.position,
            ));
            continue;
        };

        let framework = built.info.framework.clone();
        if frameworks.infos.contains_key(&framework) {
            tracing::warn!(
                framework = key,
                resolved = %framework.short_folder_name(),
                "framework declared more than once; the last declaration wins"
            );
        }
        tracing::debug!(framework = %framework.short_folder_name(), "read framework");
        frameworks.options.insert(framework.clone(), built.compiler_options);
        frameworks.infos.insert(framework, built.info);
    }
    Ok(frameworks)
}

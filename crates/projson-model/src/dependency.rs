//! Dependency entries: `"Name": "1.0"` or `"Name": { "version": ..., "type": ..., "target": ... }`.

use std::path::{Path, PathBuf};

use projson_tree::{JsonObject, JsonValue, ValueKind};
use serde::Serialize;

use crate::error::{ErrorKind, ProjectError, Result};
use crate::range::VersionRange;

/// How a dependency participates in the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryDependencyType {
    #[default]
    Default,
    /// Needed only while building; not flowed to consumers.
    Build,
    Private,
    Dev,
    Preprocess,
}

impl LibraryDependencyType {
    /// Case-insensitive token lookup.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "build" => Some(Self::Build),
            "private" => Some(Self::Private),
            "dev" => Some(Self::Dev),
            "preprocess" => Some(Self::Preprocess),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Build => "build",
            Self::Private => "private",
            Self::Dev => "dev",
            Self::Preprocess => "preprocess",
        }
    }
}

impl std::fmt::Display for LibraryDependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of library a dependency must resolve to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryType {
    #[default]
    Unspecified,
    ReferenceAssembly,
    Project,
    Package,
}

impl LibraryType {
    /// Case-insensitive token lookup. `Unspecified` has no token.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "project" => Some(Self::Project),
            "package" => Some(Self::Package),
            "referenceassembly" | "reference" => Some(Self::ReferenceAssembly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::ReferenceAssembly => "referenceAssembly",
            Self::Project => "project",
            Self::Package => "package",
        }
    }
}

impl std::fmt::Display for LibraryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named dependency with its constraints and where it was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRange {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_range: Option<VersionRange>,
    pub target: LibraryType,
    pub dependency_type: LibraryDependencyType,
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// The shape of a single dependency value.
enum DependencySpec<'a> {
    /// `"Name": "1.0"`
    ScalarRange(&'a JsonValue),
    /// `"Name": { ... }`
    Detailed(&'a JsonObject),
    Invalid,
}

impl<'a> DependencySpec<'a> {
    fn classify(value: &'a JsonValue) -> Self {
        match &value.kind {
            ValueKind::String(_) => DependencySpec::ScalarRange(value),
            ValueKind::Object(obj) => DependencySpec::Detailed(obj),
            _ => DependencySpec::Invalid,
        }
    }
}

/// Read the `property` dependency map of `settings` and append one
/// [`LibraryRange`] per entry to `results`.
///
/// With `is_gac_or_framework_reference` set, entries default to
/// [`LibraryType::ReferenceAssembly`] and any `target` member is ignored.
pub fn populate_dependencies(
    path: &Path,
    results: &mut Vec<LibraryRange>,
    settings: &JsonObject,
    property: &str,
    is_gac_or_framework_reference: bool,
) -> Result<()> {
    let Some(dependencies) = settings.object(property) else {
        return Ok(());
    };

    for (name, value) in dependencies.iter() {
        if name.is_empty() {
            return Err(ProjectError::format(
                ErrorKind::EmptyDependencyKey,
                "Unable to resolve dependency ''.",
                path,
                Some(value.position),
            ));
        }

        let mut dependency_type = LibraryDependencyType::Default;
        let mut target = if is_gac_or_framework_reference {
            LibraryType::ReferenceAssembly
        } else {
            LibraryType::Unspecified
        };

        let version = match DependencySpec::classify(value) {
            DependencySpec::ScalarRange(node) => Some(node),
            DependencySpec::Detailed(spec) => {
                // A version that is not a string means no range.
                let version = spec.get("version").filter(|node| node.as_str().is_some());

                if let Some(node) = spec.get("type") {
                    dependency_type = parse_dependency_type(path, name, node)?;
                }

                if !is_gac_or_framework_reference {
                    if let Some(parsed) = spec
                        .string("target")
                        .filter(|t| !t.is_empty())
                        .and_then(LibraryType::parse)
                    {
                        target = parsed;
                    }
                }

                version
            }
            DependencySpec::Invalid => {
                return Err(ProjectError::format(
                    ErrorKind::InvalidDependencyValue,
                    format!("Invalid dependency version: {name}. The format is not recognizable."),
                    path,
                    Some(value.position),
                ))
            }
        };

        let version_range = match version {
            Some(node) => parse_range(path, node)?,
            None => None,
        };

        results.push(LibraryRange {
            name: name.to_string(),
            version_range,
            target,
            dependency_type,
            path: path.to_path_buf(),
            line: value.line(),
            column: value.column(),
        });
    }

    Ok(())
}

fn parse_dependency_type(path: &Path, name: &str, node: &JsonValue) -> Result<LibraryDependencyType> {
    node.as_str()
        .and_then(LibraryDependencyType::parse)
        .ok_or_else(|| {
            let token = node.as_str().unwrap_or(node.kind_name());
            ProjectError::format(
                ErrorKind::InvalidDependencyType,
                format!("Invalid dependency type '{token}' for dependency '{name}'."),
                path,
                Some(node.position),
            )
        })
}

/// Parse a version string node. An empty string means "any version".
fn parse_range(path: &Path, node: &JsonValue) -> Result<Option<VersionRange>> {
    let text = node.as_str().unwrap_or_default();
    if text.is_empty() {
        return Ok(None);
    }
    VersionRange::parse(text).map(Some).map_err(|e| {
        ProjectError::format(
            ErrorKind::MalformedVersionRange,
            e.to_string(),
            path,
            Some(node.position),
        )
    })
}

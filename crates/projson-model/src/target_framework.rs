//! Per-framework sections of a descriptor.

use std::path::Path;

use projson_frameworks::Framework;
use projson_tree::JsonObject;
use serde::Serialize;

use crate::compiler_options::{read_compiler_options, CompilerOptions};
use crate::dependency::{populate_dependencies, LibraryRange};
use crate::error::Result;

/// Everything a descriptor declares for one target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFrameworkInfo {
    pub framework: Framework,
    /// `dependencies` followed by `frameworkAssemblies`.
    pub dependencies: Vec<LibraryRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped_project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb_path: Option<String>,
}

/// A framework section that was recognized and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltFramework {
    pub info: TargetFrameworkInfo,
    pub compiler_options: CompilerOptions,
}

/// Build the section for `key`. Returns `Ok(None)` when `key` names an
/// unsupported framework.
pub fn build_target_framework(
    path: &Path,
    key: &str,
    node: &JsonObject,
) -> Result<Option<BuiltFramework>> {
    let mut compiler_options = read_compiler_options(node, path)?.unwrap_or_default();

    let framework = Framework::parse(key);
    if framework.is_unsupported() {
        return Ok(None);
    }

    if let Some(define) = make_framework_define(&framework) {
        compiler_options.add_define(define);
    }

    let mut dependencies = Vec::new();
    populate_dependencies(path, &mut dependencies, node, "dependencies", false)?;
    populate_dependencies(path, &mut dependencies, node, "frameworkAssemblies", true)?;

    let bin = node.object("bin");
    let info = TargetFrameworkInfo {
        framework,
        dependencies,
        wrapped_project: node.string("wrappedProject").map(str::to_string),
        assembly_path: bin.and_then(|b| b.string("assembly")).map(str::to_string),
        pdb_path: bin.and_then(|b| b.string("pdb")).map(str::to_string),
    };

    Ok(Some(BuiltFramework {
        info,
        compiler_options,
    }))
}

/// The preprocessor symbol for a framework: `net40-client` becomes
/// `NET40_CLIENT`. Portable frameworks get none, as does any name that
/// would not be a valid identifier.
pub fn make_framework_define(framework: &Framework) -> Option<String> {
    if framework.is_pcl() {
        return None;
    }
    let candidate: String = framework
        .short_folder_name()
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '-' | '+' | '.' => '_',
            other => other,
        })
        .collect();

    let mut chars = candidate.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_') {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::LibraryType;

    fn define(token: &str) -> Option<String> {
        make_framework_define(&Framework::parse(token))
    }

    fn build(key: &str, json: &str) -> Option<BuiltFramework> {
        let root = projson_tree::read_str(json).unwrap();
        build_target_framework(Path::new("project.json"), key, root.as_object().unwrap()).unwrap()
    }

    #[test]
    fn defines_for_common_frameworks() {
        assert_eq!(define("net45").as_deref(), Some("NET45"));
        assert_eq!(define("net40-client").as_deref(), Some("NET40_CLIENT"));
        assert_eq!(define("dnxcore50").as_deref(), Some("DNXCORE50"));
        assert_eq!(define("netstandard1.3").as_deref(), Some("NETSTANDARD1_3"));
    }

    #[test]
    fn portable_has_no_define() {
        assert_eq!(define("portable-net45+win8"), None);
        assert_eq!(define("portable-Profile7"), None);
    }

    #[test]
    fn unsupported_key_is_not_built() {
        assert!(build("not a framework", "{}").is_none());
        assert!(build("net4x5", r#"{ "dependencies": { "A": "1.0" } }"#).is_none());
    }

    #[test]
    fn define_joins_declared_defines() {
        let built = build(
            "net45",
            r#"{ "compilationOptions": { "define": ["CUSTOM", "NET45"] } }"#,
        )
        .unwrap();
        assert_eq!(
            built.compiler_options.defines().collect::<Vec<_>>(),
            vec!["CUSTOM", "NET45"]
        );
    }

    #[test]
    fn options_default_to_define_only() {
        let built = build("net40-client", "{}").unwrap();
        assert_eq!(
            built.compiler_options.defines().collect::<Vec<_>>(),
            vec!["NET40_CLIENT"]
        );
        assert_eq!(built.compiler_options.optimize, None);
    }

    #[test]
    fn dependencies_then_framework_assemblies() {
        let built = build(
            "net45",
            r#"{
                "dependencies": { "Pkg": "1.0" },
                "frameworkAssemblies": { "System.Xml": "" },
                "wrappedProject": "../wrapped/wrapped.csproj",
                "bin": { "assembly": "bin/lib.dll", "pdb": "bin/lib.pdb" }
            }"#,
        )
        .unwrap();

        let info = built.info;
        let names: Vec<_> = info.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Pkg", "System.Xml"]);
        assert_eq!(info.dependencies[0].target, LibraryType::Unspecified);
        assert_eq!(info.dependencies[1].target, LibraryType::ReferenceAssembly);
        assert_eq!(info.wrapped_project.as_deref(), Some("../wrapped/wrapped.csproj"));
        assert_eq!(info.assembly_path.as_deref(), Some("bin/lib.dll"));
        assert_eq!(info.pdb_path.as_deref(), Some("bin/lib.pdb"));
    }

    #[test]
    fn bad_options_fail_even_for_unsupported_keys() {
        let root = projson_tree::read_str(r#"{ "compilationOptions": { "optimize": 1 } }"#).unwrap();
        let result = build_target_framework(Path::new("p"), "bogus!", root.as_object().unwrap());
        assert!(result.is_err());
    }
}

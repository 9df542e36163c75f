//! `compilationOptions` blocks and how they layer.

use std::collections::BTreeSet;
use std::path::Path;

use projson_tree::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ProjectError, Result};

/// Name of the member holding a compiler options block.
pub const COMPILATION_OPTIONS: &str = "compilationOptions";

/// A bundle of compiler switches. Unset fields inherit from a less
/// specific scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(rename = "define", default, skip_serializing_if = "Option::is_none")]
    pub defines: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unsafe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings_as_errors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_sign: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_entry_point: Option<bool>,
}

impl CompilerOptions {
    /// The built-in `Debug` configuration.
    pub fn debug() -> Self {
        Self {
            defines: Some(["DEBUG", "TRACE"].into_iter().map(String::from).collect()),
            optimize: Some(false),
            ..Self::default()
        }
    }

    /// The built-in `Release` configuration.
    pub fn release() -> Self {
        Self {
            defines: Some(["RELEASE", "TRACE"].into_iter().map(String::from).collect()),
            optimize: Some(true),
            ..Self::default()
        }
    }

    /// Add a define symbol. Duplicates collapse.
    pub fn add_define(&mut self, define: impl Into<String>) {
        self.defines.get_or_insert_with(BTreeSet::new).insert(define.into());
    }

    /// The define symbols, empty when unset.
    pub fn defines(&self) -> impl Iterator<Item = &str> {
        self.defines.iter().flatten().map(String::as_str)
    }

    /// Layer option sets from least to most specific. Later sets win field
    /// by field; define sets are unioned.
    pub fn combine<'a>(layers: impl IntoIterator<Item = &'a CompilerOptions>) -> Self {
        let mut result = Self::default();
        for layer in layers {
            if let Some(defines) = &layer.defines {
                result
                    .defines
                    .get_or_insert_with(BTreeSet::new)
                    .extend(defines.iter().cloned());
            }
            overlay(&mut result.language_version, &layer.language_version);
            overlay(&mut result.allow_unsafe, &layer.allow_unsafe);
            overlay(&mut result.platform, &layer.platform);
            overlay(&mut result.warnings_as_errors, &layer.warnings_as_errors);
            overlay(&mut result.optimize, &layer.optimize);
            overlay(&mut result.key_file, &layer.key_file);
            overlay(&mut result.delay_sign, &layer.delay_sign);
            overlay(&mut result.strong_name, &layer.strong_name);
            overlay(&mut result.emit_entry_point, &layer.emit_entry_point);
        }
        result
    }
}

fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

/// Read the `compilationOptions` member of `node`.
///
/// Returns `None` when the member is absent or null. Every field is
/// optional, but a field of the wrong type is an error.
pub fn read_compiler_options(node: &JsonObject, path: &Path) -> Result<Option<CompilerOptions>> {
    let Some(value) = node.get(COMPILATION_OPTIONS) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(raw) = value.as_object() else {
        return Err(malformed(path, value, COMPILATION_OPTIONS, "an object"));
    };

    let fields = OptionFields { raw, path };
    Ok(Some(CompilerOptions {
        defines: fields.string_set("define")?,
        language_version: fields.string("languageVersion")?,
        allow_unsafe: fields.bool("allowUnsafe")?,
        platform: fields.string("platform")?,
        warnings_as_errors: fields.bool("warningsAsErrors")?,
        optimize: fields.bool("optimize")?,
        key_file: fields.string("keyFile")?,
        delay_sign: fields.bool("delaySign")?,
        strong_name: fields.bool("strongName")?,
        emit_entry_point: fields.bool("emitEntryPoint")?,
    }))
}

fn malformed(path: &Path, value: &JsonValue, field: &str, expected: &str) -> ProjectError {
    ProjectError::format(
        ErrorKind::MalformedCompilerOption,
        format!("'{field}' must be {expected}, found {}.", value.kind_name()),
        path,
        Some(value.position),
    )
}

/// Typed, null-tolerant field access over a raw options object.
struct OptionFields<'a> {
    raw: &'a JsonObject,
    path: &'a Path,
}

impl OptionFields<'_> {
    fn present(&self, field: &str) -> Option<&JsonValue> {
        self.raw.get(field).filter(|v| !v.is_null())
    }

    fn bool(&self, field: &str) -> Result<Option<bool>> {
        match self.present(field) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| malformed(self.path, v, field, "a boolean")),
        }
    }

    fn string(&self, field: &str) -> Result<Option<String>> {
        match self.present(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| malformed(self.path, v, field, "a string")),
        }
    }

    fn string_set(&self, field: &str) -> Result<Option<BTreeSet<String>>> {
        match self.present(field) {
            None => Ok(None),
            Some(v) => v
                .as_string_array()
                .map(|items| Some(items.into_iter().collect()))
                .ok_or_else(|| malformed(self.path, v, field, "an array of strings")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projson_tree::Position;

    fn read(json: &str) -> Result<Option<CompilerOptions>> {
        let root = projson_tree::read_str(json).unwrap();
        read_compiler_options(root.as_object().unwrap(), Path::new("project.json"))
    }

    #[test]
    fn absent_or_null_block() {
        assert_eq!(read("{}").unwrap(), None);
        assert_eq!(read(r#"{ "compilationOptions": null }"#).unwrap(), None);
    }

    #[test]
    fn reads_every_field() {
        let options = read(
            r#"{ "compilationOptions": {
                "define": ["FOO", "BAR", "FOO"],
                "languageVersion": "csharp6",
                "allowUnsafe": true,
                "platform": "x64",
                "warningsAsErrors": false,
                "optimize": true,
                "keyFile": "../key.snk",
                "delaySign": null,
                "strongName": true,
                "emitEntryPoint": true
            } }"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(options.defines().collect::<Vec<_>>(), vec!["BAR", "FOO"]);
        assert_eq!(options.language_version.as_deref(), Some("csharp6"));
        assert_eq!(options.allow_unsafe, Some(true));
        assert_eq!(options.platform.as_deref(), Some("x64"));
        assert_eq!(options.warnings_as_errors, Some(false));
        assert_eq!(options.optimize, Some(true));
        assert_eq!(options.key_file.as_deref(), Some("../key.snk"));
        assert_eq!(options.delay_sign, None);
        assert_eq!(options.strong_name, Some(true));
        assert_eq!(options.emit_entry_point, Some(true));
    }

    #[test]
    fn empty_block_is_all_unset() {
        assert_eq!(
            read(r#"{ "compilationOptions": {} }"#).unwrap(),
            Some(CompilerOptions::default())
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        for json in [
            r#"{ "compilationOptions": { "optimize": "yes" } }"#,
            r#"{ "compilationOptions": { "define": "DEBUG" } }"#,
            r#"{ "compilationOptions": { "define": ["A", 1] } }"#,
            r#"{ "compilationOptions": { "keyFile": false } }"#,
            r#"{ "compilationOptions": [] }"#,
        ] {
            let err = read(json).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::MalformedCompilerOption), "{json}");
        }
    }

    #[test]
    fn error_points_at_value() {
        let err = read("{\n  \"compilationOptions\": {\n    \"optimize\": 1\n  }\n}").unwrap_err();
        assert_eq!(err.position(), Some(Position::new(3, 17)));
    }

    #[test]
    fn combine_layers_fields_and_unions_defines() {
        let defaults = CompilerOptions {
            defines: Some(["SHARED".to_string()].into()),
            platform: Some("anycpu".into()),
            warnings_as_errors: Some(true),
            ..CompilerOptions::default()
        };
        let framework = CompilerOptions {
            defines: Some(["NET45".to_string()].into()),
            platform: Some("x86".into()),
            ..CompilerOptions::default()
        };

        let merged = CompilerOptions::combine([&defaults, &CompilerOptions::release(), &framework]);
        assert_eq!(
            merged.defines().collect::<Vec<_>>(),
            vec!["NET45", "RELEASE", "SHARED", "TRACE"]
        );
        assert_eq!(merged.platform.as_deref(), Some("x86"));
        assert_eq!(merged.optimize, Some(true));
        assert_eq!(merged.warnings_as_errors, Some(true));
        assert_eq!(merged.allow_unsafe, None);
    }

    #[test]
    fn builtin_configurations() {
        let debug = CompilerOptions::debug();
        assert_eq!(debug.defines().collect::<Vec<_>>(), vec!["DEBUG", "TRACE"]);
        assert_eq!(debug.optimize, Some(false));
        assert_eq!(CompilerOptions::release().optimize, Some(true));
    }

    #[test]
    fn serializes_with_descriptor_names() {
        let mut options = CompilerOptions::debug();
        options.emit_entry_point = Some(true);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "define": ["DEBUG", "TRACE"], "optimize": false, "emitEntryPoint": true })
        );
    }
}

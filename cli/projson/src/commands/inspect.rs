//! `projson inspect`: read a descriptor and print the model.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use projson_model::{Diagnostic, Project, ProjectReader, ReadSettings};
use serde::Serialize;

use crate::Format;

#[derive(Serialize)]
struct Report<'a> {
    project: &'a Project,
    diagnostics: &'a [Diagnostic],
}

/// Read `descriptor` and print it. Returns `false` when an error-severity
/// diagnostic was reported.
pub fn run(descriptor: &Path, settings: ReadSettings, format: Format) -> Result<bool> {
    let mut diagnostics = Vec::new();
    let project = ProjectReader::new(settings)
        .get_project(descriptor, &mut diagnostics)
        .with_context(|| format!("reading {}", descriptor.display()))?;

    match format {
        Format::Json => {
            let report = Report {
                project: &project,
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => {
            render_text(&project, &mut io::stdout().lock())?;
            for diagnostic in &diagnostics {
                eprintln!("{diagnostic}");
            }
        }
    }

    Ok(!diagnostics.iter().any(Diagnostic::is_error))
}

fn render_text(project: &Project, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=== Project: {} ===", project.name)?;
    writeln!(out, "Path:         {}", project.project_file_path.display())?;
    writeln!(out, "Version:      {}", project.version)?;
    writeln!(out, "File version: {}", project.assembly_file_version)?;
    if let Some(description) = &project.description {
        writeln!(out, "Description:  {description}")?;
    }
    if !project.authors.is_empty() {
        writeln!(out, "Authors:      {}", project.authors.join(", "))?;
    }

    if !project.dependencies.is_empty() {
        writeln!(out)?;
        writeln!(out, "--- Dependencies ---")?;
        for dep in &project.dependencies {
            writeln!(out, "  {}", describe_dependency(dep))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "--- Configurations ---")?;
    for name in project.configurations() {
        let options = project.compiler_options(name, None);
        let defines: Vec<&str> = options.defines().collect();
        writeln!(out, "  {name:<12} defines: [{}]", defines.join(", "))?;
    }

    for (framework, info) in &project.target_frameworks {
        writeln!(out)?;
        writeln!(out, "--- Framework: {} ({framework}) ---", framework.short_folder_name())?;
        if let Some(options) = project.compiler_options_by_framework.get(framework) {
            let defines: Vec<&str> = options.defines().collect();
            writeln!(out, "  defines: [{}]", defines.join(", "))?;
        }
        for dep in &info.dependencies {
            writeln!(out, "  {}", describe_dependency(dep))?;
        }
        if let Some(wrapped) = &info.wrapped_project {
            writeln!(out, "  wraps: {wrapped}")?;
        }
        if let Some(assembly) = &info.assembly_path {
            writeln!(out, "  assembly: {assembly}")?;
        }
    }

    if !project.commands.is_empty() {
        writeln!(out)?;
        writeln!(out, "--- Commands ---")?;
        for (name, line) in &project.commands {
            writeln!(out, "  {name:<12} {line}")?;
        }
    }
    Ok(())
}

fn describe_dependency(dep: &projson_model::LibraryRange) -> String {
    let range = dep
        .version_range
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "*".to_string());
    format!("{:<32} {range:<16} {} {}", dep.name, dep.dependency_type, dep.target)
}

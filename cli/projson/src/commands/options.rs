//! `projson options`: effective compiler options as JSON.

use std::path::Path;

use anyhow::{bail, Context, Result};
use projson_model::{CompilerOptions, Framework, Project, ProjectReader, ReadSettings};

/// Print the options for `configuration`, narrowed to `framework` if given.
pub fn run(
    descriptor: &Path,
    settings: ReadSettings,
    configuration: &str,
    framework: Option<&str>,
) -> Result<()> {
    let mut diagnostics = Vec::new();
    let project = ProjectReader::new(settings)
        .get_project(descriptor, &mut diagnostics)
        .with_context(|| format!("reading {}", descriptor.display()))?;
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }

    let options = effective(&project, configuration, framework)?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn effective(project: &Project, configuration: &str, framework: Option<&str>) -> Result<CompilerOptions> {
    if !project.compiler_options_by_configuration.contains_key(configuration) {
        let known: Vec<&str> = project.configurations().collect();
        bail!(
            "unknown configuration '{configuration}'. Known configurations: {}",
            known.join(", ")
        );
    }
    let framework = match framework {
        Some(token) => {
            let framework: Framework = token.parse()?;
            if project.target_framework(&framework).is_none() {
                bail!(
                    "'{}' is not a framework of project '{}'",
                    framework.short_folder_name(),
                    project.name
                );
            }
            Some(framework)
        }
        None => None,
    };
    Ok(project.compiler_options(configuration, framework.as_ref()))
}

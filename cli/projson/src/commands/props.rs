//! `projson props`: write a package props file.

use std::path::Path;

use anyhow::Result;
use projson_model::PackagePropsFile;

pub fn run(import: &str, additional: &[String], output: &Path) -> Result<()> {
    let props = PackagePropsFile::new(import).with_imports(additional.iter().cloned());
    if props.write(output)? {
        println!("wrote {}", output.display());
    } else {
        println!("{} is up to date", output.display());
    }
    Ok(())
}

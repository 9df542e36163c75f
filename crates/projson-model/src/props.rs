//! Package props file: an MSBuild `<Project>` that imports other props files.
//!
//! Writing is idempotent. The file is only rewritten when the SHA-256 of
//! the new content differs from what is on disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Errors that can occur while writing a props file.
#[derive(Debug, thiserror::Error)]
pub enum PropsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The imports to emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagePropsFile {
    pub props_file_import: String,
    pub additional_imports: Vec<String>,
}

impl PackagePropsFile {
    pub fn new(props_file_import: impl Into<String>) -> Self {
        Self {
            props_file_import: props_file_import.into(),
            additional_imports: Vec::new(),
        }
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Every import, primary included, in ordinal order.
    pub fn imports(&self) -> Vec<&str> {
        let mut imports: Vec<&str> = std::iter::once(self.props_file_import.as_str())
            .chain(self.additional_imports.iter().map(String::as_str))
            .collect();
        imports.sort_unstable();
        imports
    }

    /// The file content. No XML declaration, two-space indentation.
    pub fn render(&self) -> String {
        let mut out = String::from("<Project>\n");
        for import in self.imports() {
            out.push_str(&format!("  <Import Project=\"{}\" />\n", escape_attribute(import)));
        }
        out.push_str("</Project>");
        out
    }

    /// Write to `target` unless it already holds identical content.
    /// Returns whether the file was written.
    pub fn write(&self, target: &Path) -> Result<bool, PropsError> {
        let data = self.render().into_bytes();
        let new_hash = content_hash(&data);

        let existing = match std::fs::read(target) {
            Ok(bytes) => Some(content_hash(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(PropsError::Read {
                    path: target.to_path_buf(),
                    source,
                })
            }
        };

        match existing {
            None => tracing::debug!(path = %target.display(), "creating props file"),
            Some(old) if old == new_hash => {
                tracing::debug!(path = %target.display(), hash = %new_hash, "props file unchanged; skipping");
                return Ok(false);
            }
            Some(old) => tracing::debug!(
                path = %target.display(),
                hash = %new_hash,
                previous = %old,
                "updating props file"
            ),
        }

        std::fs::write(target, &data).map_err(|source| PropsError::Write {
            path: target.to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}

/// Lowercase hex SHA-256 of `data`.
fn content_hash(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

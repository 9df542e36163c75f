//! Finding the descriptor a command should read.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use projson_model::PROJECT_FILE_NAME;

/// Resolve an explicit path (file or directory) or, without one, search
/// upward from the current directory.
pub fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) if path.is_dir() => Ok(path.join(PROJECT_FILE_NAME)),
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir()?;
            match find_upward(&cwd) {
                Some(found) => Ok(found),
                None => bail!(
                    "no {PROJECT_FILE_NAME} found in {} or any parent directory",
                    cwd.display()
                ),
            }
        }
    }
}

/// Search `start_dir` and its ancestors for a descriptor file.
pub fn find_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(PROJECT_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "found descriptor");
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_in_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE_NAME), "{}").unwrap();

        let found = find_upward(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_FILE_NAME));
    }

    #[test]
    fn walks_up_to_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE_NAME), "{}").unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_upward(&nested).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_FILE_NAME));
    }

    #[test]
    fn directory_argument_names_its_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path().join(PROJECT_FILE_NAME));

        let file = dir.path().join("other.json");
        assert_eq!(resolve(Some(&file)).unwrap(), file);
    }
}

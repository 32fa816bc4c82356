// Host directory creation for container volumes

use crate::errors::{ProvisionError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of ensuring a single directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryOutcome {
    Created(PathBuf),
    AlreadyPresent(PathBuf),
}

impl DirectoryOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DirectoryOutcome::Created(p) | DirectoryOutcome::AlreadyPresent(p) => p,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, DirectoryOutcome::Created(_))
    }
}

/// Create each directory and any missing parents.
///
/// Existing directories are left untouched. Stops at the first path that
/// cannot be created.
pub fn ensure_directories<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DirectoryOutcome>> {
    paths.iter().map(|p| ensure_directory(p.as_ref())).collect()
}

fn ensure_directory(path: &Path) -> Result<DirectoryOutcome> {
    if path.is_dir() {
        return Ok(DirectoryOutcome::AlreadyPresent(path.to_path_buf()));
    }

    if path.exists() {
        return Err(ProvisionError::Filesystem {
            path: path.to_path_buf(),
            reason: "a non-directory file exists at this path".to_string(),
        });
    }

    fs::create_dir_all(path).map_err(|e| ProvisionError::Filesystem {
        path: path.to_path_buf(),
        reason: describe(&e),
    })?;

    Ok(DirectoryOutcome::Created(path.to_path_buf()))
}

fn describe(err: &std::io::Error) -> String {
    match err.kind() {
        ErrorKind::PermissionDenied => format!("permission denied ({})", err),
        ErrorKind::AlreadyExists => format!("a parent path is not a directory ({})", err),
        _ => err.to_string(),
    }
}

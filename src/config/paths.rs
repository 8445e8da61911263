//! Home directory resolution and symlink ancestry checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::StowError;

/// Resolve the home directory: explicit override first, then the OS notion of home.
/// The result is canonicalized when it exists so symlink targets and task paths
/// agree with what the filesystem reports.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf, StowError> {
    let home = match explicit {
        Some(p) => p.to_path_buf(),
        None => dirs::home_dir().ok_or(StowError::HomeUnavailable)?,
    };
    if !home.is_absolute() {
        return Err(StowError::HomeUnavailable);
    }
    Ok(dunce::canonicalize(&home).unwrap_or(home))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

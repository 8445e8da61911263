//! Observed link state of a managed home path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What is at `src` relative to its expected backing path `dst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// `src` is a symlink whose target is exactly `dst`.
    Linked,
    /// `src` is a symlink to anything else. Never touched automatically.
    Broken { target: PathBuf },
    /// A plain file or directory sits at `src`.
    Unmanaged,
    /// Nothing at `src`, not even a dangling symlink.
    Missing,
}

/// Inspect `src` without following it.
pub fn link_state(src: &Path, dst: &Path) -> io::Result<LinkState> {
    let meta = match fs::symlink_metadata(src) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Missing),
        Err(e) => return Err(e),
    };
    if !meta.file_type().is_symlink() {
        return Ok(LinkState::Unmanaged);
    }
    let target = fs::read_link(src)?;
    if target == dst {
        Ok(LinkState::Linked)
    } else {
        Ok(LinkState::Broken { target })
    }
}

/// True when anything (including a dangling symlink) occupies `path`.
pub fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX modes; log files are opened without ACL changes.
//! - Volumes are compared by path prefix (drive letter or UNC share).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path};

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Two existing paths are on the same volume when their canonical prefixes match.
pub fn same_device_existing(a: &Path, b: &Path) -> io::Result<bool> {
    fn prefix(p: &Path) -> io::Result<Option<std::ffi::OsString>> {
        let canonical = fs::canonicalize(p)?;
        Ok(canonical.components().find_map(|c| match c {
            Component::Prefix(pre) => Some(pre.as_os_str().to_ascii_uppercase()),
            _ => None,
        }))
    }
    Ok(prefix(a)? == prefix(b)?)
}

/// Create `link` pointing at `target`; Windows needs to know the target kind.
pub fn create_symlink(target: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Remove the symlink itself; directory symlinks need `remove_dir` on Windows.
pub fn remove_symlink(link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(link)
    } else {
        fs::remove_file(link)
    }
}

//! File-vs-directory conflict detection.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What is actually on disk (symlinks followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, fifos, devices: never managed.
    Other,
}

impl EntryKind {
    pub fn expected(is_dir: bool) -> Self {
        if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Other => "special file",
        })
    }
}

/// An existing entry whose type disagrees with its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConflict {
    pub path: PathBuf,
    pub expected: EntryKind,
    pub found: EntryKind,
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

/// Ok when `path` is absent or matches the expected type.
/// A dangling symlink counts as absent, like a plain `stat` would see it.
pub fn check(path: &Path, expected_is_dir: bool) -> Result<(), TypeConflict> {
    let Ok(meta) = fs::metadata(path) else {
        return Ok(());
    };
    let ft = meta.file_type();
    let found = if ft.is_dir() {
        EntryKind::Directory
    } else if ft.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    let expected = EntryKind::expected(expected_is_dir);
    if found == expected {
        Ok(())
    } else {
        Err(TypeConflict {
            path: path.to_path_buf(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn absent_path_is_fine_either_way() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.child("missing");
        assert!(check(missing.path(), true).is_ok());
        assert!(check(missing.path(), false).is_ok());
    }

    #[test]
    fn matching_types_pass() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dir = temp.child("dir");
        dir.create_dir_all().unwrap();
        let file = temp.child("file.txt");
        file.touch().unwrap();
        assert!(check(dir.path(), true).is_ok());
        assert!(check(file.path(), false).is_ok());
    }

    #[test]
    fn mismatches_are_classified() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("file.txt");
        file.touch().unwrap();
        let err = check(file.path(), true).unwrap_err();
        assert_eq!(err.to_string(), "expected directory, found file");

        let dir = temp.child("dir");
        dir.create_dir_all().unwrap();
        let err = check(dir.path(), false).unwrap_err();
        assert_eq!(err.to_string(), "expected file, found directory");
        assert_eq!(err.path, dir.path());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_judged_by_its_target() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dir = temp.child("real");
        dir.create_dir_all().unwrap();
        let link = temp.child("link");
        std::os::unix::fs::symlink(dir.path(), link.path()).unwrap();
        assert!(check(link.path(), true).is_ok());
        assert!(check(link.path(), false).is_err());
    }
}

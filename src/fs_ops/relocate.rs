//! Moving entries between home and a storage.
//! Tries a rename first; across devices it copies the tree and removes the source.
//! Never overwrites: an occupied destination is an error.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::platform::create_symlink;

use super::helpers::io_error_with_help;
use super::link::occupied;

/// Move `from` to `to`, keeping the entry's type and contents.
pub fn relocate(from: &Path, to: &Path) -> io::Result<()> {
    if occupied(to) {
        return Err(io_error_with_help("move into", to)(io::Error::from(
            io::ErrorKind::AlreadyExists,
        )));
    }

    match fs::rename(from, to) {
        Ok(()) => {
            if let Some(parent) = to.parent() {
                // A failed fsync should not turn a completed rename into a failure.
                let _ = fsync_dir(parent);
            }
            debug!(from = %from.display(), to = %to.display(), "renamed");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(from = %from.display(), to = %to.display(), "rename crosses devices; copying instead");
            copy_then_remove(from, to)
        }
        Err(e) => Err(io_error_with_help("rename", from)(e)),
    }
}

/// Create an empty directory, or an empty file when `is_dir` is false.
/// An existing file is opened in append mode and left as is.
pub fn materialize(dst: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::create_dir_all(dst).map_err(io_error_with_help("create directory", dst))
    } else {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dst)
            .map(drop)
            .map_err(io_error_with_help("create file", dst))
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error_with_help("create directory", parent))
        }
        _ => Ok(()),
    }
}

fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind::CrossesDevices is not stable on all toolchains; use raw codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17, // ERROR_NOT_SAME_DEVICE
        _ => false,
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(from).map_err(io_error_with_help("stat", from))?;
    let copied = if meta.is_dir() {
        copy_tree(from, to)
    } else {
        copy_entry(from, to, meta.file_type())
    };
    if let Err(e) = copied {
        // Leave no half-copied destination behind; the source is untouched.
        let _ = if fs::symlink_metadata(to).is_ok_and(|m| m.is_dir()) {
            fs::remove_dir_all(to)
        } else {
            fs::remove_file(to)
        };
        return Err(e);
    }

    if meta.is_dir() {
        fs::remove_dir_all(from).map_err(io_error_with_help("remove source directory", from))
    } else {
        fs::remove_file(from).map_err(io_error_with_help("remove source file", from))
    }
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry.path().strip_prefix(from).map_err(io::Error::other)?;
        let target = if rel.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(rel)
        };
        if entry.file_type().is_dir() {
            fs::create_dir(&target).map_err(io_error_with_help("create directory", &target))?;
        } else {
            copy_entry(entry.path(), &target, entry.file_type())?;
        }
    }
    Ok(())
}

fn copy_entry(from: &Path, to: &Path, ft: fs::FileType) -> io::Result<()> {
    if ft.is_symlink() {
        let target = fs::read_link(from).map_err(io_error_with_help("read symlink", from))?;
        let is_dir = fs::metadata(from).is_ok_and(|m| m.is_dir());
        create_symlink(&target, to, is_dir).map_err(io_error_with_help("recreate symlink", to))
    } else if ft.is_file() {
        fs::copy(from, to)
            .map(drop)
            .map_err(io_error_with_help("copy file", to))
    } else {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot copy special file '{}'", from.display()),
        ))
    }
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn relocates_directory_tree() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("folder");
        src.child("sub").create_dir_all().unwrap();
        src.child("one.txt").write_str("one").unwrap();
        src.child("sub/two.txt").write_str("two").unwrap();
        let dst = temp.child("store/folder");
        ensure_parent(dst.path()).unwrap();

        relocate(src.path(), dst.path()).unwrap();

        assert!(!src.path().exists());
        assert_eq!(fs::read_to_string(dst.path().join("one.txt")).unwrap(), "one");
        assert_eq!(fs::read_to_string(dst.path().join("sub/two.txt")).unwrap(), "two");
    }

    #[test]
    fn refuses_occupied_destination() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("a.txt");
        src.write_str("new").unwrap();
        let dst = temp.child("b.txt");
        dst.write_str("old").unwrap();

        let err = relocate(src.path(), dst.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(src.path()).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.path()).unwrap(), "old");
    }

    #[test]
    fn copy_fallback_keeps_tree_and_symlinks() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("tree");
        src.child("nested").create_dir_all().unwrap();
        src.child("nested/data.bin").write_binary(&[0u8, 1, 2, 255]).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink("nested/data.bin", src.child("alias").path()).unwrap();
        let dst = temp.child("copy");

        copy_then_remove(src.path(), dst.path()).unwrap();

        assert!(!src.path().exists());
        assert_eq!(fs::read(dst.path().join("nested/data.bin")).unwrap(), [0u8, 1, 2, 255]);
        #[cfg(unix)]
        assert_eq!(
            fs::read_link(dst.path().join("alias")).unwrap(),
            Path::new("nested/data.bin")
        );
    }

    #[test]
    fn materialize_never_truncates() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("notes.txt");
        file.write_str("keep me").unwrap();
        materialize(file.path(), false).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "keep me");

        let fresh = temp.child("fresh.txt");
        materialize(fresh.path(), false).unwrap();
        assert_eq!(fs::metadata(fresh.path()).unwrap().len(), 0);

        let dir = temp.child("a/b");
        materialize(dir.path(), true).unwrap();
        assert!(dir.path().is_dir());
    }
}

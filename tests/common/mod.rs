//! Shared fixtures for the reconciliation tests.
#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use home_stow::{DeviceGuard, Manifest, Outcome, Reconciler, StowError, Summary};
use tempfile::TempDir;

/// A scratch home directory and one storage, both under a canonical temp root.
pub struct Fixture {
    _root: TempDir,
    pub home: PathBuf,
    pub store: PathBuf,
    pub config: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        // macOS hands out /var/... which is a symlink to /private/var/...
        let base = fs::canonicalize(root.path()).unwrap();
        let home = base.join("home");
        let store = base.join("store");
        fs::create_dir(&home).unwrap();
        fs::create_dir(&store).unwrap();
        Self {
            config: base.join("stow.ini"),
            _root: root,
            home,
            store,
        }
    }

    /// Write a config with a single storage `s` holding `body`, and load it.
    pub fn manifest(&self, body: &str) -> Manifest {
        let text = format!("[dirs]\ns = {}\n\n[s]\n{body}", self.store.display());
        fs::write(&self.config, text).unwrap();
        Manifest::load(&self.config, &self.home).unwrap()
    }

    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    pub fn store_path(&self, name: &str) -> PathBuf {
        self.store.join(name)
    }
}

/// Confirmation that fails the test if it is ever asked.
pub fn no_prompt(from: &Path, to: &Path) -> bool {
    panic!("unexpected prompt for {} -> {}", from.display(), to.display())
}

pub fn cross_device(_: &Path, _: &Path) -> io::Result<bool> {
    Ok(false)
}

/// Run both passes with a guard that must never prompt.
pub fn apply(manifest: &Manifest) -> (Summary, Vec<Outcome>) {
    apply_with(manifest, DeviceGuard::new(no_prompt)).unwrap()
}

pub fn apply_with(
    manifest: &Manifest,
    guard: DeviceGuard<'_>,
) -> Result<(Summary, Vec<Outcome>), StowError> {
    let mut seen = Vec::new();
    let summary = Reconciler::new(guard, &mut seen).apply(manifest)?;
    Ok((summary, seen))
}

pub fn is_symlink_to(link: &Path, target: &Path) -> bool {
    fs::symlink_metadata(link)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
        && fs::read_link(link).map(|t| t == target).unwrap_or(false)
}

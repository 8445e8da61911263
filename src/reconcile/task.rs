//! Expanding the manifest into concrete tasks and ordering them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{Declaration, Direction, Manifest, Storage};
use crate::fs_ops::{check_conflict, link_state, LinkState};
use crate::normalize::backing_path;

use super::report::Outcome;

/// One concrete move/link unit for a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub storage: String,
    pub relative: String,
    /// Path under home
    pub src: PathBuf,
    /// Path under the storage's base directory
    pub dst: PathBuf,
    pub is_dir: bool,
}

impl Task {
    pub fn new(home: &Path, storage: &Storage, decl: &Declaration) -> Self {
        Self {
            storage: storage.id.clone(),
            relative: decl.relative.clone(),
            src: home.join(&decl.relative),
            dst: backing_path(&storage.base_dir, &decl.relative),
            is_dir: decl.is_dir,
        }
    }
}

/// Build the task list for one direction.
///
/// Declarations are skipped (and reported) when the key could not be parsed,
/// when the home path was already claimed by an earlier declaration, when two
/// paths share a backing path, or when the existing entry has the wrong type.
/// A foreign symlink is left for the reconciler to classify.
pub fn expand(
    manifest: &Manifest,
    direction: Direction,
    report: &mut dyn FnMut(Outcome),
) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    let mut backing: HashMap<PathBuf, &str> = HashMap::new();

    for storage in manifest.storages() {
        for bad in storage.rejected.iter().filter(|r| r.direction == direction) {
            report(Outcome::InvalidDeclaration {
                storage: storage.id.clone(),
                raw: bad.raw.clone(),
                reason: bad.reason,
            });
        }
        for decl in storage.declarations.iter().filter(|d| d.direction == direction) {
            if let Some(first) = claimed.get(decl.relative.as_str()) {
                report(Outcome::Duplicate {
                    storage: storage.id.clone(),
                    relative: decl.relative.clone(),
                    first_storage: first.to_string(),
                });
                continue;
            }
            claimed.insert(&decl.relative, &storage.id);

            let task = Task::new(manifest.home(), storage, decl);
            if let Some(other) = backing.get(&task.dst) {
                report(Outcome::BackingCollision {
                    storage: storage.id.clone(),
                    relative: decl.relative.clone(),
                    other: other.to_string(),
                    dst: task.dst,
                });
                continue;
            }
            backing.insert(task.dst.clone(), &decl.relative);

            // Foreign symlinks are reported by the reconciler, whatever they point at
            let foreign = matches!(
                link_state(&task.src, &task.dst),
                Ok(LinkState::Broken { .. })
            );
            if !foreign {
                if let Err(conflict) = check_conflict(&task.src, task.is_dir) {
                    report(Outcome::TypeConflict {
                        storage: storage.id.clone(),
                        conflict,
                    });
                    continue;
                }
            }
            tasks.push(task);
        }
    }
    tasks
}

/// Deepest first when adding, shallowest first when removing.
/// The sort is stable, so equal lengths keep declaration order.
pub fn sort_tasks(tasks: &mut [Task], direction: Direction) {
    match direction {
        Direction::Add => tasks.sort_by_key(|t| std::cmp::Reverse(t.src.as_os_str().len())),
        Direction::Remove => tasks.sort_by_key(|t| t.src.as_os_str().len()),
    }
}

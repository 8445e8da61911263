//! Link-state reconciliation.
//!
//! Turns the manifest into ordered tasks and moves each managed path between
//! `Unmanaged` and `Linked`:
//!
//! ```text
//! Unmanaged --add: move + link--> Linked --remove: unlink + move back--> Unmanaged
//! Linked    --add--> Linked (no-op)
//! Broken    --any--> Broken (reported, never repaired)
//! ```
//!
//! Every step re-reads the disk before acting, so re-running after an
//! interruption or a partial failure picks up where the last run stopped.

mod report;
mod task;

pub use report::{LinkAction, Outcome, Reporter, Severity, Summary};
pub use task::{expand, sort_tasks, Task};

use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{Direction, Manifest};
use crate::device::DeviceGuard;
use crate::errors::StowError;
use crate::fs_ops::{ensure_parent, link_state, materialize, occupied, relocate, LinkState};
use crate::platform::{create_symlink, remove_symlink};
use crate::shutdown;

pub struct Reconciler<'a> {
    guard: DeviceGuard<'a>,
    reporter: &'a mut dyn Reporter,
    summary: Summary,
    should_stop: fn() -> bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(guard: DeviceGuard<'a>, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            guard,
            reporter,
            summary: Summary::default(),
            should_stop: shutdown::is_requested,
        }
    }

    /// Replace the interrupt check polled between tasks and after each confirmation.
    pub fn with_stop_check(mut self, check: fn() -> bool) -> Self {
        self.should_stop = check;
        self
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Additions first, then removals.
    pub fn apply(&mut self, manifest: &Manifest) -> Result<Summary, StowError> {
        self.apply_additions(manifest)?;
        self.apply_removals(manifest)?;
        Ok(self.summary)
    }

    pub fn apply_additions(&mut self, manifest: &Manifest) -> Result<(), StowError> {
        let tasks = self.plan(manifest, Direction::Add);
        for task in &tasks {
            self.checkpoint()?;
            self.link(task)?;
        }
        Ok(())
    }

    pub fn apply_removals(&mut self, manifest: &Manifest) -> Result<(), StowError> {
        let tasks = self.plan(manifest, Direction::Remove);
        for task in &tasks {
            self.checkpoint()?;
            self.unlink(task)?;
        }
        Ok(())
    }

    fn plan(&mut self, manifest: &Manifest, direction: Direction) -> Vec<Task> {
        let mut tasks = expand(manifest, direction, &mut |o| self.emit(o));
        sort_tasks(&mut tasks, direction);
        info!(%direction, tasks = tasks.len(), "reconciling");
        tasks
    }

    /// Polled before each task and again after a confirmation, since an
    /// interrupt can arrive while the prompt is waiting.
    fn checkpoint(&self) -> Result<(), StowError> {
        if (self.should_stop)() {
            warn!("interrupt requested; stopping before the next move");
            return Err(StowError::Interrupted);
        }
        Ok(())
    }

    fn emit(&mut self, outcome: Outcome) {
        debug!(kind = outcome.kind(), severity = ?outcome.severity(), "{outcome}");
        self.summary.record(&outcome);
        self.reporter.report(&outcome);
    }

    /// Report a per-task failure; the run carries on.
    fn fail(&mut self, path: &Path, op: &'static str, e: io::Error) -> Result<(), StowError> {
        self.emit(Outcome::Failed {
            path: path.to_path_buf(),
            op,
            error: e.to_string(),
        });
        Ok(())
    }

    fn link(&mut self, task: &Task) -> Result<(), StowError> {
        let (src, dst) = (task.src.as_path(), task.dst.as_path());
        let state = match link_state(src, dst) {
            Ok(s) => s,
            Err(e) => return self.fail(src, "inspect", e),
        };
        debug!(src = %src.display(), ?state, "link");

        let action = match state {
            LinkState::Linked => {
                self.emit(Outcome::AlreadyLinked {
                    src: src.to_path_buf(),
                    dst: dst.to_path_buf(),
                });
                return Ok(());
            }
            LinkState::Broken { target } => {
                self.emit(Outcome::WrongSymlink {
                    src: src.to_path_buf(),
                    target,
                    expected: dst.to_path_buf(),
                });
                return Ok(());
            }
            LinkState::Unmanaged => {
                if occupied(dst) {
                    self.emit(Outcome::DestinationExists {
                        src: src.to_path_buf(),
                        dst: dst.to_path_buf(),
                    });
                    return Ok(());
                }
                match self.guard.confirm_move(src, dst) {
                    Ok(true) => self.checkpoint()?,
                    Ok(false) => {
                        self.emit(Outcome::Cancelled {
                            src: src.to_path_buf(),
                            dst: dst.to_path_buf(),
                        });
                        return Ok(());
                    }
                    Err(e) => return self.fail(src, "device check", e),
                }
                if let Err(e) = ensure_parent(dst).and_then(|()| relocate(src, dst)) {
                    return self.fail(src, "move", e);
                }
                LinkAction::Moved
            }
            LinkState::Missing => {
                let action = if occupied(dst) {
                    LinkAction::Adopted
                } else {
                    LinkAction::Created
                };
                if let Err(e) = ensure_parent(dst).and_then(|()| materialize(dst, task.is_dir)) {
                    return self.fail(dst, "create", e);
                }
                action
            }
        };

        if let Err(e) = ensure_parent(src).and_then(|()| create_symlink(dst, src, task.is_dir)) {
            return self.fail(src, "create symlink", e);
        }
        self.emit(Outcome::Linked {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            action,
        });
        Ok(())
    }

    fn unlink(&mut self, task: &Task) -> Result<(), StowError> {
        let (src, dst) = (task.src.as_path(), task.dst.as_path());
        match link_state(src, dst) {
            Ok(LinkState::Linked) => {}
            Ok(found) => {
                self.emit(Outcome::NotLinked {
                    src: src.to_path_buf(),
                    dst: dst.to_path_buf(),
                    found,
                });
                return Ok(());
            }
            Err(e) => return self.fail(src, "inspect", e),
        }

        if let Err(e) = remove_symlink(src, task.is_dir) {
            return self.fail(src, "remove symlink", e);
        }
        self.emit(Outcome::Unlinked {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });

        if !occupied(dst) {
            self.emit(Outcome::NothingToRestore {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
            return Ok(());
        }
        match self.guard.confirm_move(dst, src) {
            Ok(true) => self.checkpoint()?,
            Ok(false) => {
                self.emit(Outcome::RestoreCancelled {
                    src: src.to_path_buf(),
                    dst: dst.to_path_buf(),
                });
                return Ok(());
            }
            Err(e) => return self.fail(dst, "device check", e),
        }
        if let Err(e) = ensure_parent(src).and_then(|()| relocate(dst, src)) {
            return self.fail(dst, "move back", e);
        }
        self.emit(Outcome::Restored {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
        Ok(())
    }
}

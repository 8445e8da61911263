//! Per-task outcomes and how they are delivered.

use std::fmt;
use std::path::PathBuf;

use crate::fs_ops::{LinkState, TypeConflict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something changed on disk as requested.
    Ok,
    /// Nothing to do, or the operator declined.
    Info,
    /// Skipped; the declaration or the disk needs a look.
    Warn,
    /// Skipped or failed; manual intervention required.
    Error,
}

/// How an added path ended up with content at its backing location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// The home entry was moved into the storage.
    Moved,
    /// Nothing existed anywhere; an empty entry was created in the storage.
    Created,
    /// Content was already in the storage (e.g. after a declined restore).
    Adopted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InvalidDeclaration {
        storage: String,
        raw: String,
        reason: &'static str,
    },
    TypeConflict {
        storage: String,
        conflict: TypeConflict,
    },
    Duplicate {
        storage: String,
        relative: String,
        first_storage: String,
    },
    BackingCollision {
        storage: String,
        relative: String,
        other: String,
        dst: PathBuf,
    },
    AlreadyLinked {
        src: PathBuf,
        dst: PathBuf,
    },
    WrongSymlink {
        src: PathBuf,
        target: PathBuf,
        expected: PathBuf,
    },
    DestinationExists {
        src: PathBuf,
        dst: PathBuf,
    },
    Cancelled {
        src: PathBuf,
        dst: PathBuf,
    },
    Linked {
        src: PathBuf,
        dst: PathBuf,
        action: LinkAction,
    },
    Unlinked {
        src: PathBuf,
        dst: PathBuf,
    },
    Restored {
        src: PathBuf,
        dst: PathBuf,
    },
    RestoreCancelled {
        src: PathBuf,
        dst: PathBuf,
    },
    NothingToRestore {
        src: PathBuf,
        dst: PathBuf,
    },
    NotLinked {
        src: PathBuf,
        dst: PathBuf,
        found: LinkState,
    },
    Failed {
        path: PathBuf,
        op: &'static str,
        error: String,
    },
}

impl Outcome {
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::Linked { .. } | Outcome::Unlinked { .. } | Outcome::Restored { .. } => {
                Severity::Ok
            }
            Outcome::AlreadyLinked { .. } | Outcome::Cancelled { .. } => Severity::Info,
            Outcome::InvalidDeclaration { .. }
            | Outcome::TypeConflict { .. }
            | Outcome::Duplicate { .. }
            | Outcome::BackingCollision { .. }
            | Outcome::RestoreCancelled { .. }
            | Outcome::NothingToRestore { .. }
            | Outcome::NotLinked { .. } => Severity::Warn,
            Outcome::WrongSymlink { .. }
            | Outcome::DestinationExists { .. }
            | Outcome::Failed { .. } => Severity::Error,
        }
    }

    /// Short stable name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::InvalidDeclaration { .. } => "invalid_declaration",
            Outcome::TypeConflict { .. } => "type_conflict",
            Outcome::Duplicate { .. } => "duplicate",
            Outcome::BackingCollision { .. } => "backing_collision",
            Outcome::AlreadyLinked { .. } => "already_linked",
            Outcome::WrongSymlink { .. } => "wrong_symlink",
            Outcome::DestinationExists { .. } => "destination_exists",
            Outcome::Cancelled { .. } => "cancelled",
            Outcome::Linked { .. } => "linked",
            Outcome::Unlinked { .. } => "unlinked",
            Outcome::Restored { .. } => "restored",
            Outcome::RestoreCancelled { .. } => "restore_cancelled",
            Outcome::NothingToRestore { .. } => "nothing_to_restore",
            Outcome::NotLinked { .. } => "not_linked",
            Outcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InvalidDeclaration {
                storage,
                raw,
                reason,
            } => write!(f, "'{raw}' [{storage}]: {reason}; skipping"),
            Outcome::TypeConflict { storage, conflict } => write!(
                f,
                "{} [{}]: {}; skipping",
                conflict.path.display(),
                storage,
                conflict
            ),
            Outcome::Duplicate {
                storage,
                relative,
                first_storage,
            } => write!(
                f,
                "{relative} [{storage}]: already declared in [{first_storage}]; skipping"
            ),
            Outcome::BackingCollision {
                storage,
                relative,
                other,
                dst,
            } => write!(
                f,
                "{relative} [{storage}]: backing path {} is also used by '{other}'; skipping",
                dst.display()
            ),
            Outcome::AlreadyLinked { src, dst } => write!(
                f,
                "{} -> {} already configured; skipping",
                src.display(),
                dst.display()
            ),
            Outcome::WrongSymlink {
                src,
                target,
                expected,
            } => write!(
                f,
                "{} is a symlink to {}, expected {}; leaving it alone",
                src.display(),
                target.display(),
                expected.display()
            ),
            Outcome::DestinationExists { src, dst } => write!(
                f,
                "{} already exists; not moving {}",
                dst.display(),
                src.display()
            ),
            Outcome::Cancelled { src, dst } => write!(
                f,
                "move {} -> {} cancelled",
                src.display(),
                dst.display()
            ),
            Outcome::Linked { src, dst, action } => {
                let how = match action {
                    LinkAction::Moved => "moved",
                    LinkAction::Created => "created empty",
                    LinkAction::Adopted => "existing",
                };
                write!(f, "linked {} -> {} ({how})", src.display(), dst.display())
            }
            Outcome::Unlinked { src, dst } => write!(
                f,
                "removed link {} -> {}",
                src.display(),
                dst.display()
            ),
            Outcome::Restored { src, dst } => write!(
                f,
                "restored {} from {}",
                src.display(),
                dst.display()
            ),
            Outcome::RestoreCancelled { src, dst } => write!(
                f,
                "restore {} -> {} cancelled; content remains at {}",
                dst.display(),
                src.display(),
                dst.display()
            ),
            Outcome::NothingToRestore { src, dst } => write!(
                f,
                "{} does not exist; nothing to restore to {}",
                dst.display(),
                src.display()
            ),
            Outcome::NotLinked { src, dst, found } => {
                let what = match found {
                    LinkState::Broken { target } => format!("links to {}", target.display()),
                    LinkState::Unmanaged => "is not a symlink".to_string(),
                    LinkState::Missing => "does not exist".to_string(),
                    LinkState::Linked => "is linked".to_string(),
                };
                write!(
                    f,
                    "{} {what}, expected a link to {}; leaving it alone",
                    src.display(),
                    dst.display()
                )
            }
            Outcome::Failed { path, op, error } => {
                write!(f, "{op} failed for {}: {error}", path.display())
            }
        }
    }
}

/// Receives each outcome as soon as it happens.
pub trait Reporter {
    fn report(&mut self, outcome: &Outcome);
}

/// Collects outcomes; handy for tests and callers that render later.
impl Reporter for Vec<Outcome> {
    fn report(&mut self, outcome: &Outcome) {
        self.push(outcome.clone());
    }
}

/// Outcome counts by severity for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub ok: usize,
    pub info: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome.severity() {
            Severity::Ok => self.ok += 1,
            Severity::Info => self.info += 1,
            Severity::Warn => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed, {} unchanged, {} warnings, {} errors",
            self.ok, self.info, self.warnings, self.errors
        )
    }
}

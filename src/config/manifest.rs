//! Validated storage manifest.
//!
//! Built once from the INI document and never mutated afterwards. Holds the
//! home directory it was resolved against so every later path derivation uses
//! the same value.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::StowError;
use crate::normalize::{strip_home_token, HOME_TOKEN};

use super::ini::IniDocument;
use super::types::Direction;

/// Section mapping storage ids to base directories.
pub const DIRS_SECTION: &str = "dirs";

/// One configured home-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Key exactly as written in the config
    pub raw: String,
    /// Cleaned `/`-joined relative path (no marker, no home token, no trailing `/`)
    pub relative: String,
    pub direction: Direction,
    pub is_dir: bool,
}

/// A key that does not name a usable home path. Kept so the run can report it
/// and carry on with the rest of the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub raw: String,
    pub direction: Direction,
    pub reason: &'static str,
}

impl Declaration {
    /// Parse one key of a storage section.
    ///
    /// `-` marks removal (whitespace after it is ignored), a trailing `/` marks a
    /// directory, and a leading `HOME/` is dropped.
    pub fn parse(raw: &str) -> Result<Self, Rejected> {
        let raw_trimmed = raw.trim();
        let (direction, body) = match raw_trimmed.strip_prefix('-') {
            Some(rest) => (Direction::Remove, rest.trim_start()),
            None => (Direction::Add, raw_trimmed),
        };
        let invalid = |reason: &'static str| Rejected {
            raw: raw.to_string(),
            direction,
            reason,
        };

        let is_dir = body.ends_with('/');
        let body = strip_home_token(body);

        if body.starts_with('/') {
            return Err(invalid("paths must be relative to the home directory"));
        }

        let mut parts = Vec::new();
        for part in body.split('/') {
            match part {
                "" | "." => continue,
                ".." => return Err(invalid("'..' would escape the home directory")),
                p => parts.push(p),
            }
        }
        if parts.is_empty() {
            return Err(invalid("path is empty"));
        }

        Ok(Self {
            raw: raw.to_string(),
            relative: parts.join("/"),
            direction,
            is_dir,
        })
    }
}

/// A named backing location and the paths it manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    pub id: String,
    pub base_dir: PathBuf,
    pub declarations: Vec<Declaration>,
    /// Keys that failed to parse, in file order
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    home: PathBuf,
    storages: Vec<Storage>,
}

impl Manifest {
    /// Read, parse and validate the config file at `path`.
    pub fn load(path: &Path, home: &Path) -> Result<Self, StowError> {
        if !path.is_file() {
            return Err(StowError::ConfigNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| StowError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = IniDocument::parse(&text).map_err(|message| StowError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })?;
        let manifest = Self::from_document(&doc, home)?;
        debug!(
            config = %path.display(),
            storages = manifest.storages.len(),
            declarations = manifest.storages.iter().map(|s| s.declarations.len()).sum::<usize>(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    pub fn from_document(doc: &IniDocument, home: &Path) -> Result<Self, StowError> {
        let dirs = doc.section(DIRS_SECTION).ok_or(StowError::MissingDirs)?;

        let mut storages = Vec::with_capacity(dirs.entries.len());
        for entry in &dirs.entries {
            let base_dir = resolve_base(&entry.key, entry.value.as_deref(), home)?;
            let mut declarations = Vec::new();
            let mut rejected = Vec::new();
            match doc.section(&entry.key) {
                Some(section) => {
                    for key in &section.entries {
                        match Declaration::parse(&key.key) {
                            Ok(decl) => declarations.push(decl),
                            Err(bad) => rejected.push(bad),
                        }
                    }
                }
                None => {
                    warn!(storage = %entry.key, "storage has no section; nothing to manage");
                }
            }
            storages.push(Storage {
                id: entry.key.clone(),
                base_dir,
                declarations,
                rejected,
            });
        }

        for section in doc.sections() {
            if section.name != DIRS_SECTION && dirs.get(&section.name).is_none() {
                warn!(section = %section.name, "section has no [dirs] entry; ignored");
            }
        }

        Ok(Self {
            home: home.to_path_buf(),
            storages,
        })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn storages(&self) -> &[Storage] {
        &self.storages
    }
}

/// Substitute a leading `HOME` / `~` placeholder and require an absolute result.
fn resolve_base(storage: &str, value: Option<&str>, home: &Path) -> Result<PathBuf, StowError> {
    let invalid = |value: &str, reason: &'static str| StowError::InvalidBase {
        storage: storage.to_string(),
        value: value.to_string(),
        reason,
    };

    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(invalid(value, "no base directory given"));
    }

    let substituted = [HOME_TOKEN, "~"].into_iter().find_map(|token| {
        let rest = value.strip_prefix(token)?;
        if rest.is_empty() {
            Some(home.to_path_buf())
        } else {
            rest.strip_prefix('/').map(|r| home.join(r.trim_start_matches('/')))
        }
    });
    let base = substituted.unwrap_or_else(|| PathBuf::from(value));

    if !base.is_absolute() {
        return Err(invalid(value, "base directory must be absolute"));
    }
    Ok(base)
}

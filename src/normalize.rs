//! Backing-store naming.
//!
//! A home-relative path becomes a single flat file name inside the storage's base
//! directory: every `-` is doubled first, then every `/` becomes `-`. Doubling
//! first keeps ordinary names apart: `a-b` -> `a--b`, `a/b` -> `a-b`. A component
//! that starts or ends with `-` can still meet another path's name (`a-/b` and
//! `a/-b` both give `a---b`); expansion catches that per storage.

use std::path::{Path, PathBuf};

/// Placeholder for the home directory accepted in config files.
pub const HOME_TOKEN: &str = "HOME";

/// Strip a leading `HOME/` placeholder from a declared path.
pub fn strip_home_token(raw: &str) -> &str {
    raw.strip_prefix(HOME_TOKEN)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(raw)
}

/// Map a home-relative path to its flat backing-store name.
///
/// Trailing separators (directory markers) are removed before escaping, so a
/// declared `foo/` and `foo` both map to `foo` and no trailing `-` is produced.
pub fn normalize(relative: &str) -> String {
    let trimmed = strip_home_token(relative).trim_end_matches('/');
    trimmed.replace('-', "--").replace('/', "-")
}

/// `base_dir / normalize(relative)`. Link and unlink both derive `dst` here.
pub fn backing_path(base_dir: &Path, relative: &str) -> PathBuf {
    base_dir.join(normalize(relative))
}

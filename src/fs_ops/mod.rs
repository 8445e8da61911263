//! Filesystem primitives used by the reconciler.

pub mod conflict;
mod helpers;
pub mod link;
pub mod relocate;

pub use conflict::{check as check_conflict, EntryKind, TypeConflict};
pub use helpers::io_error_with_help;
pub use link::{link_state, occupied, LinkState};
pub use relocate::{ensure_parent, materialize, relocate};

//! Index file format
//!
//! The index tracks every file the repository knows about. Each tracked path
//! has three slots holding a blob key, one per area the file can live in:
//!
//! - `wdir`: the file as last seen in the working directory
//! - `stage`: the version selected for the next commit
//! - `repo`: the version in the current HEAD commit
//!
//! ## File Format
//!
//! ```text
//! <path> <wdir> <stage> <repo>
//! ```
//!
//! One line per tracked path, sorted by path. A slot is `0` when unset, `-`
//! when the file was deleted, or the 40-character hex key of a blob.

pub mod index_entry;

/// Text of a slot marking a deleted file
pub const DELETED_SLOT: &str = "-";

//! Stored object types
//!
//! Every piece of content is stored as an immutable object named by the SHA-1
//! key of its serialized form:
//!
//! - **Blob**: one file, its repository-relative path and raw bytes
//! - **Tree**: one directory, naming its files and sub-directories by key
//! - **Commit**: a root tree, an optional parent commit and a message
//!
//! Every serialized object starts with a header line `<type>[ <name>]\n`.
//! [`tree_builder`] assembles the tree hierarchy for a new commit.

pub mod blob;
pub mod commit;
pub mod hash_key;
pub mod object;
pub mod object_type;
pub mod tree;
pub mod tree_builder;

/// Length of a SHA-1 digest in bytes
pub const HASH_KEY_LENGTH: usize = 20;

/// Length of a SHA-1 digest in hexadecimal format
pub const HASH_KEY_HEX_LENGTH: usize = 40;

/// Text written wherever a key is absent (no parent, no HEAD commit, empty index slot)
pub const NULL_KEY: &str = "0";

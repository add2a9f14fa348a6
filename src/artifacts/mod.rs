//! Repository data structures and algorithms
//!
//! - `branch`: Branch names and branch records
//! - `checkout`: Checkout state machine
//! - `core`: Shared error type
//! - `index`: Index entry and slot types
//! - `log`: Commit history traversal
//! - `objects`: Stored object types (blob, tree, commit) and tree assembly
//! - `status`: Per-file status resolution

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;

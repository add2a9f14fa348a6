//! Command implementations
//!
//! Each command is an `impl Repository` block in its own file. Commands
//! return plain data for library callers and print their human-readable
//! output to the repository's writer.

pub mod porcelain;

//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Per-file tracking table (working directory, stage, HEAD)
//! - `refs`: Branches and HEAD
//! - `repository`: Repository handle tying the areas together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;

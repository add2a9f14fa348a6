//! Per-file status resolution
//!
//! - `file_status`: the status of one path, derived from its three index slots

pub mod file_status;

//! twig: a small version-control engine
//!
//! - `areas`: object database, index, refs and working directory, tied
//!   together by [`areas::repository::Repository`]
//! - `artifacts`: object model, index slots, status resolution, checkout
//! - `commands`: user-facing commands as `impl Repository` blocks

pub mod areas;
pub mod artifacts;
pub mod commands;

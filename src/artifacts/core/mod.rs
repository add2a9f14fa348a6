//! Shared types used across the repository areas and commands

pub mod error;

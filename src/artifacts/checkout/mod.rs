//! Checkout of a commit into the working directory and index
//!
//! Every tracked path the target would overwrite is checked for local
//! changes before anything is written, so a blocked checkout leaves the
//! working directory and the index exactly as they were.

pub mod migration;

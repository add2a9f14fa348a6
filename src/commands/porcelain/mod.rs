//! User-facing commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Track and stage files
//! - `commit`: Record the staged files as a new commit
//! - `status`: Classify every tracked and working directory file
//! - `log`: Show the commit history of the current branch
//! - `branch`: Create or list branches
//! - `checkout`: Switch branches

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod status;

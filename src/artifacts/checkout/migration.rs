//! Checkout migration
//!
//! A migration moves the working directory and the index from the current
//! commit to a target commit. It runs as a small state machine:
//!
//! ```text
//! Idle -> Scanning -> Aborted
//!                  -> Applying -> Reconciling -> Done
//! Idle -> Done                       (target is already checked out)
//! ```
//!
//! - **Scanning** looks at every blob of the target tree; a tracked path with
//!   staged or unstaged changes blocks the checkout. So does anything but
//!   committed content where a file and a directory trade places.
//! - **Applying** clears committed files out of the way of new directories,
//!   then writes every target blob and points all three index slots at it.
//! - **Reconciling** settles tracked paths the target does not contain.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_status::FileStatus;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Idle,
    Scanning,
    Aborted,
    Applying,
    Reconciling,
    Done,
}

pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    /// Index to update
    index: &'r mut Index,
    state: MigrationState,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database, workspace: &'r Workspace, index: &'r mut Index) -> Self {
        Migration {
            database,
            workspace,
            index,
            state: MigrationState::Idle,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Move from the `current` commit to `target`
    ///
    /// The index must already reflect the working directory
    /// (see [`Index::update_all`]).
    pub fn apply(&mut self, current: Option<&HashKey>, target: &Commit) -> anyhow::Result<()> {
        if current == Some(&target.object_id()) {
            self.transition(MigrationState::Done);
            return Ok(());
        }

        self.transition(MigrationState::Scanning);
        let blobs = target
            .load_tree(self.database)?
            .collect_all_blobs(self.database)?;

        let blocked = self.scan(&blobs)?;
        if !blocked.is_empty() {
            self.transition(MigrationState::Aborted);
            return Err(RepositoryError::CheckoutBlocked(blocked).into());
        }

        self.transition(MigrationState::Applying);
        // committed files standing where the target needs a directory
        let file_parents = blobs
            .iter()
            .filter_map(|blob| self.file_parent(blob.path()))
            .collect::<BTreeSet<_>>();
        for parent in file_parents {
            self.workspace.remove_file(parent)?;
        }
        for blob in &blobs {
            self.write_blob(blob)?;
        }

        self.transition(MigrationState::Reconciling);
        let target_paths = blobs.iter().map(Blob::path).collect::<BTreeSet<_>>();
        self.reconcile(&target_paths)?;

        self.transition(MigrationState::Done);
        Ok(())
    }

    /// Paths whose local content the target would overwrite
    ///
    /// Besides the target paths themselves, this covers files under a
    /// directory the target replaces with a file, and a file the target
    /// replaces with a directory. Only committed content may be replaced.
    fn scan(&self, blobs: &[Blob]) -> anyhow::Result<Vec<String>> {
        let mut blocked = BTreeSet::new();

        for path in blobs.iter().map(Blob::path) {
            if matches!(
                self.index.resolve_status(path),
                FileStatus::Staged | FileStatus::Modified
            ) {
                blocked.insert(path.to_string());
            }

            if self.workspace.is_dir(path) {
                blocked.extend(
                    self.workspace
                        .list_files(Some(path))?
                        .into_iter()
                        .filter(|file| !self.is_committed(file)),
                );
            }

            if let Some(parent) = self.file_parent(path)
                && !self.is_committed(parent)
            {
                blocked.insert(parent.to_string());
            }
        }

        Ok(blocked.into_iter().collect())
    }

    fn is_committed(&self, path: &str) -> bool {
        self.index.resolve_status(path) == FileStatus::Committed
    }

    /// Nearest ancestor directory of `path` that exists on disk as a file
    fn file_parent<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.match_indices('/')
            .map(|(end, _)| &path[..end])
            .find(|ancestor| self.workspace.exists(ancestor))
    }

    fn write_blob(&mut self, blob: &Blob) -> anyhow::Result<()> {
        self.workspace.write_file(blob.path(), blob.content())?;

        if !self.index.contains(blob.path()) {
            self.index.start_tracking(blob.path())?;
        }
        self.index.set_all(blob.path(), blob.object_id())
    }

    fn reconcile(&mut self, target_paths: &BTreeSet<&str>) -> anyhow::Result<()> {
        let leftovers = self
            .index
            .entries()
            .map(|entry| entry.path.clone())
            .filter(|path| !target_paths.contains(path.as_str()))
            .collect::<Vec<_>>();

        for path in &leftovers {
            match self.index.resolve_status(path) {
                FileStatus::Committed => {
                    self.index.remove(path)?;
                    self.workspace.remove_file(path)?;
                }
                FileStatus::Staged => self.index.clear_repo(path)?,
                FileStatus::Modified => self.index.clear_stage_and_repo(path)?,
                FileStatus::Deleted => self.index.remove(path)?,
                FileStatus::Ignored | FileStatus::Untracked => {}
            }
        }

        Ok(())
    }

    fn transition(&mut self, state: MigrationState) {
        tracing::debug!(from = ?self.state, to = ?state, "checkout");
        self.state = state;
    }
}

use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::index::index_entry::Slot;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::tree_builder::{BlobEntry, TreeBuilder};
use std::io::Write;

impl Repository {
    /// Record every staged file as a new commit on the current branch
    ///
    /// # Returns
    ///
    /// The key of the new commit
    pub fn commit(&mut self, message: &str) -> anyhow::Result<HashKey> {
        let pending = self
            .index
            .entries()
            .any(|entry| entry.stage.is_set() && entry.stage != entry.repo);
        if !pending {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let staged = self
            .index
            .entries()
            .filter(|entry| entry.stage.is_set())
            .map(|entry| (entry.path.clone(), entry.stage))
            .collect::<Vec<_>>();

        let tree = TreeBuilder::build(
            staged
                .iter()
                .filter_map(|(path, stage)| stage.key().map(|key| BlobEntry::new(path.clone(), *key))),
        )?;

        let head = self.refs.get_head()?;
        let commit = Commit::new(head.commit().copied(), tree.object_id(), message);
        let commit_key = self.database.store_commit_with_tree(&commit, &tree)?;
        self.refs.set_branch_commit(head.name(), commit_key)?;

        for (path, stage) in &staged {
            match stage {
                Slot::Deleted => self.index.remove(path)?,
                _ => self.index.commit(path)?,
            }
        }

        tracing::info!(branch = %head.name(), commit = %commit_key, "created commit");
        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            head.name(),
            if head.commit().is_none() {
                "(root-commit) "
            } else {
                ""
            },
            commit_key.to_short_hex(),
            commit.short_message()
        )?;

        Ok(commit_key)
    }
}

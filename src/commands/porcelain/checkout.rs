use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Switch the working directory, the index and HEAD to `target`
    ///
    /// Nothing changes when a local modification would be overwritten.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        let unknown = || RepositoryError::UnknownBranch(target.to_string());

        let name = BranchName::try_parse(target.to_string()).map_err(|_| unknown())?;
        let branch = self.refs.get_branch(&name)?.ok_or_else(unknown)?;
        let head = self.refs.get_head()?;

        if head.name() == branch.name() {
            writeln!(self.writer(), "Already on '{}'", name)?;
            return Ok(());
        }

        match branch.commit() {
            Some(target_key) => {
                self.index.update_all(&self.workspace)?;

                let commit = self
                    .database
                    .retrieve_commit(target_key)?
                    .with_context(|| format!("commit {} of branch {} is missing", target_key, name))?;
                commit.checkout(
                    &self.database,
                    &self.workspace,
                    &mut self.index,
                    head.commit(),
                )?;
            }
            None if head.commit().is_none() => {}
            None => return Err(RepositoryError::NoCommitYet(name.to_string()).into()),
        }

        self.refs.set_head(&name);
        tracing::info!(branch = %name, "switched branch");
        writeln!(self.writer(), "Switched to branch '{}'", name)?;

        Ok(())
    }
}

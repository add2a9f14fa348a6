use crate::areas::repository::Repository;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create a branch pointing at the current HEAD commit
    ///
    /// Before the first commit the branch has nothing to point at; it lives
    /// only in memory and is never written to disk.
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<Branch> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let head = self.refs.get_head()?;
        let source = head.commit().copied();

        let branch = self.refs.create_branch(branch_name, source)?;
        tracing::info!(branch = %branch.name(), commit = ?source, "created branch");

        Ok(branch)
    }

    /// Every branch, the current one marked with `*`
    pub fn list_branches(&mut self) -> anyhow::Result<Vec<Branch>> {
        let head = self.refs.get_head()?;
        let branches = self.refs.list_branches()?;

        for branch in &branches {
            if branch.name() == head.name() {
                writeln!(self.writer(), "* {}", branch.name().to_string().as_str().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch.name())?;
            }
        }

        Ok(branches)
    }
}

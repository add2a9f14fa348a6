use crate::areas::repository::Repository;
use crate::artifacts::status::file_status::FileStatus;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// Classify every tracked path and every file in the working directory
    pub fn status(&mut self) -> anyhow::Result<BTreeMap<String, FileStatus>> {
        self.index.update_all(&self.workspace)?;

        let mut statuses = self
            .index
            .entries()
            .map(|entry| (entry.path.clone(), self.index.resolve_status(&entry.path)))
            .collect::<BTreeMap<_, _>>();

        for file in self.workspace.list_files(None)? {
            statuses.entry(file).or_insert(FileStatus::Untracked);
        }

        self.print_status(&statuses)?;

        Ok(statuses)
    }

    fn print_status(&mut self, statuses: &BTreeMap<String, FileStatus>) -> anyhow::Result<()> {
        let head = self.refs.get_head()?;
        writeln!(self.writer(), "On branch {}", head.name())?;

        let staged = Self::with_status(statuses, &[FileStatus::Staged]);
        let unstaged = Self::with_status(statuses, &[FileStatus::Modified, FileStatus::Deleted]);
        let untracked = Self::with_status(statuses, &[FileStatus::Untracked]);

        if staged.is_empty() && unstaged.is_empty() && untracked.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !staged.is_empty() {
            writeln!(self.writer(), "Changes to be committed:")?;
            for (path, status) in &staged {
                writeln!(self.writer(), "{}{}", status, path)?;
            }
            writeln!(self.writer())?;
        }

        if !unstaged.is_empty() {
            writeln!(self.writer(), "Changes not staged for commit:")?;
            for (path, status) in &unstaged {
                writeln!(self.writer(), "{}{}", status, path)?;
            }
            writeln!(self.writer())?;
        }

        if !untracked.is_empty() {
            writeln!(self.writer(), "Untracked files:")?;
            for (path, status) in &untracked {
                writeln!(self.writer(), "{}{}", status, path)?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn with_status<'s>(
        statuses: &'s BTreeMap<String, FileStatus>,
        wanted: &[FileStatus],
    ) -> Vec<(&'s String, &'s FileStatus)> {
        statuses
            .iter()
            .filter(|(_, status)| wanted.contains(status))
            .collect()
    }
}

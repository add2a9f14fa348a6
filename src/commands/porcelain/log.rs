use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use colored::Colorize;
use std::io::Write;

/// One commit of the history with the files of its tree
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub commit: Commit,
    pub files: Vec<String>,
}

impl Repository {
    /// History of the current branch, newest first
    pub fn log(&mut self) -> anyhow::Result<Vec<LogEntry>> {
        let head_commit = self.refs.head_commit()?;
        let mut entries = Vec::new();

        for commit in RevList::new(&self.database, head_commit).into_iter()? {
            let commit = commit?;
            let files = commit
                .load_tree(&self.database)?
                .collect_all_blobs(&self.database)?
                .iter()
                .map(|blob| blob.path().to_string())
                .collect::<Vec<_>>();

            self.show_entry(&commit, &files)?;
            entries.push(LogEntry { commit, files });
        }

        Ok(entries)
    }

    fn show_entry(&self, commit: &Commit, files: &[String]) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit.object_id()).as_str().yellow()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }
        writeln!(self.writer())?;
        for file in files {
            writeln!(self.writer(), "    {}", file)?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}

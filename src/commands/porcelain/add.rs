use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::status::file_status::FileStatus;
use anyhow::Context;
use std::collections::BTreeSet;

impl Repository {
    /// Track and stage the files named by `paths`
    ///
    /// Directories expand to every file below them. A tracked file that is
    /// gone from disk stages its deletion.
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let mut files = BTreeSet::new();

        for user_path in paths {
            let path = self.workspace.resolve(self.cwd(), user_path)?;

            let on_disk = self.workspace.list_files(Some(&path))?;
            let deleted = self
                .index
                .tracked_under(&path)
                .into_iter()
                .filter(|tracked| !self.workspace.exists(tracked))
                .collect::<Vec<_>>();

            if on_disk.is_empty() && deleted.is_empty() {
                return Err(RepositoryError::PathspecMismatch(user_path.clone()).into());
            }
            files.extend(on_disk);
            files.extend(deleted);
        }

        for file in &files {
            self.add_file(file)?;
        }

        Ok(())
    }

    fn add_file(&mut self, path: &str) -> anyhow::Result<()> {
        if !self.index.contains(path) {
            self.index.start_tracking(path)?;
        }
        self.index.update_wdir(path, &self.workspace)?;

        match self.index.resolve_status(path) {
            FileStatus::Untracked | FileStatus::Modified => {
                let blob = self
                    .workspace
                    .parse_blob(path)?
                    .with_context(|| format!("{} vanished while being added", path))?;
                self.database.store(&blob)?;
                self.index.stage(path)?;
            }
            FileStatus::Deleted => self.index.stage(path)?,
            FileStatus::Staged | FileStatus::Committed => {}
            FileStatus::Ignored => tracing::warn!(path, "not staged, file is in no known state"),
        }

        Ok(())
    }
}

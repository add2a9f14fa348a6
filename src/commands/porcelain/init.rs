use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::NULL_KEY;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the metadata directory; refuses to run on an existing repository
    pub fn init(&mut self) -> anyhow::Result<()> {
        let metadata_path = self.metadata_path();
        if metadata_path.exists() {
            return Err(
                RepositoryError::AlreadyInitialized(self.path().display().to_string()).into(),
            );
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        fs::write(self.refs().head_path(), NULL_KEY)
            .context("Failed to create initial HEAD reference")?;

        fs::write(self.index().path(), b"").context("Failed to create .twig/index file")?;

        tracing::info!(path = %self.path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty twig repository in {}",
            metadata_path.display()
        )?;

        Ok(())
    }
}

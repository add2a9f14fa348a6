use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::RepositoryError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::Path;

/// Name of the metadata directory at the repository root
pub const METADATA_DIR: &str = ".twig";

/// Handle on one repository for the length of one command
///
/// The index and the refs are read once by [`Repository::open`] and written
/// back once by [`Repository::close`].
pub struct Repository {
    path: Box<Path>,
    /// Directory relative user paths are resolved against
    cwd: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    pub(crate) database: Database,
    pub(crate) index: Index,
    pub(crate) refs: Refs,
    pub(crate) workspace: Workspace,
}

impl Repository {
    /// Build a handle rooted at `path` without reading anything from disk
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            cwd: path.clone().into_boxed_path(),
            writer: RefCell::new(writer),
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            index: Index::new(metadata_path.join("index").into_boxed_path()),
            refs: Refs::new(metadata_path.clone().into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    /// Open the repository containing `start`, loading the index and the refs
    ///
    /// The root is the nearest of `start` and its ancestors holding a
    /// metadata directory.
    pub fn open(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let cwd = start
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", start.display()))?;

        let root = cwd
            .ancestors()
            .find(|dir| dir.join(METADATA_DIR).is_dir())
            .ok_or_else(|| RepositoryError::NotARepository(cwd.display().to_string()))?;

        let mut repository = Self::new(root, writer)?;
        repository.cwd = cwd.clone().into_boxed_path();
        repository.index.rehydrate()?;
        repository.refs.rehydrate()?;
        tracing::debug!(root = %repository.path.display(), "opened repository");

        Ok(repository)
    }

    /// Flush the index and the refs
    pub fn close(mut self) -> anyhow::Result<()> {
        self.index.write_updates()?;
        self.refs.write_updates()?;
        self.writer().flush()?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}

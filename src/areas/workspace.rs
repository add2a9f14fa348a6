use crate::areas::repository::METADATA_DIR;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Working directory rooted at the repository root
///
/// Paths handed to and returned from the workspace are repository-relative,
/// `/`-separated strings.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a user-supplied path into a repository-relative one
    ///
    /// Relative paths are taken from `base`. `.` and `..` components are
    /// folded away without touching the filesystem, so the target need not
    /// exist. The repository root itself resolves to an empty string.
    pub fn resolve(&self, base: &Path, user_path: &str) -> anyhow::Result<String> {
        let outside = || RepositoryError::OutsideRepository(user_path.to_string());

        let candidate = base.join(user_path);
        let mut normalized = PathBuf::new();
        for component in candidate.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(outside().into());
                    }
                }
                other => normalized.push(other),
            }
        }

        let relative = normalized.strip_prefix(&self.path).map_err(|_| outside())?;
        let components = relative
            .components()
            .map(|component| {
                component
                    .as_os_str()
                    .to_str()
                    .with_context(|| format!("Path is not valid UTF-8: {:?}", relative))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        if components.first() == Some(&METADATA_DIR) {
            return Err(outside().into());
        }

        Ok(components.join("/"))
    }

    /// Every file under `dir` (the whole working directory when `None`), sorted
    ///
    /// A path naming a single file yields just that file; a missing path yields nothing.
    pub fn list_files(&self, dir: Option<&str>) -> anyhow::Result<Vec<String>> {
        let root = match dir {
            Some(dir) if !dir.is_empty() => self.path.join(dir),
            _ => self.path.to_path_buf(),
        };

        if root.is_file() {
            return Ok(vec![self.relative_path(&root)?]);
        }
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        for entry in walker {
            let entry = entry.with_context(|| format!("Unable to list {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(self.relative_path(entry.path())?);
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn exists(&self, file_path: &str) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, dir_path: &str) -> bool {
        self.path.join(dir_path).is_dir()
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        std::fs::read(&full_path)
            .map(Bytes::from)
            .with_context(|| format!("Unable to read file {}", full_path.display()))
    }

    /// Snapshot the file at `file_path` as a blob, `None` when it does not exist
    pub fn parse_blob(&self, file_path: &str) -> anyhow::Result<Option<Blob>> {
        if !self.exists(file_path) {
            return Ok(None);
        }

        Ok(Some(Blob::new(file_path, self.read_file(file_path)?)))
    }

    /// Write `content` to `file_path`, creating missing parent directories
    pub fn write_file(&self, file_path: &str, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path)
                .with_context(|| format!("Failed to remove existing directory: {}", file_path))?;
        }
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for: {}", file_path))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write to file: {}", file_path))
    }

    /// Delete the file and any parent directories left empty by it
    pub fn remove_file(&self, file_path: &str) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {}", file_path))?;
        }

        let mut parent = full_path.parent();
        while let Some(dir) = parent {
            if dir == &*self.path || !Self::is_empty_dir(dir) {
                break;
            }
            std::fs::remove_dir(dir)
                .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
            parent = dir.parent();
        }

        Ok(())
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }

    fn relative_path(&self, full_path: &Path) -> anyhow::Result<String> {
        let relative = full_path
            .strip_prefix(&self.path)
            .with_context(|| format!("{} is outside the workspace", full_path.display()))?;

        relative
            .components()
            .map(|component| {
                component
                    .as_os_str()
                    .to_str()
                    .with_context(|| format!("Path is not valid UTF-8: {:?}", relative))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(|components| components.join("/"))
    }
}

//! Index (tracking table)
//!
//! The index maps every tracked path to its three slots (see
//! [`crate::artifacts::index`]). It is read once when the repository is
//! opened and written back once, when it is closed, if anything changed.
//!
//! ## Working directory scan
//!
//! [`Index::update_all`] refreshes the `wdir` slot of every tracked path from
//! disk. It runs at most once per process; later calls fail with
//! [`RepositoryError::IndexAlreadyUpdated`].

use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::index::index_entry::{IndexEntry, Slot};
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_status::FileStatus;
use anyhow::Context;
use fake::rand;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.twig/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<String, IndexEntry>,
    /// Set once the working directory has been scanned
    updated: bool,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            updated: false,
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk, replacing anything in memory
    ///
    /// A missing index file is an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.updated = false;
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;

        for (number, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let entry = IndexEntry::parse(line).with_context(|| {
                format!("Corrupt index file {} at line {}", self.path.display(), number + 1)
            })?;
            self.entries.insert(entry.path.clone(), entry);
        }

        tracing::debug!(entries = self.entries.len(), "loaded index");
        Ok(())
    }

    /// Write the index back to disk if it changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let content = self
            .entries
            .values()
            .map(|entry| format!("{}\n", entry))
            .collect::<String>();

        let temp_path = self
            .path
            .with_file_name(format!("index-{}.tmp", rand::random::<u32>()));
        std::fs::write(&temp_path, content)
            .with_context(|| format!("Unable to write index file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to replace index file {}", self.path.display()))?;

        self.changed = false;
        tracing::debug!(entries = self.entries.len(), "flushed index");
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Tracked paths at or below `dir`, or everything when `dir` is empty
    pub fn tracked_under(&self, dir: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|path| {
                dir.is_empty()
                    || path.as_str() == dir
                    || path
                        .strip_prefix(dir)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .cloned()
            .collect()
    }

    pub fn resolve_status(&self, path: &str) -> FileStatus {
        FileStatus::resolve(self.entry_by_path(path))
    }

    /// Begin tracking `path` with every slot unset
    pub fn start_tracking(&mut self, path: &str) -> anyhow::Result<()> {
        if self.entries.contains_key(path) {
            return Err(RepositoryError::DuplicateTracking(path.to_string()).into());
        }

        self.entries
            .insert(path.to_string(), IndexEntry::new(path));
        self.changed = true;
        tracing::debug!(path, "started tracking");

        Ok(())
    }

    /// Hash the current on-disk content of `path` into its `wdir` slot
    ///
    /// A file missing from disk is recorded as deleted.
    pub fn update_wdir(&mut self, path: &str, workspace: &Workspace) -> anyhow::Result<()> {
        let wdir = match workspace.parse_blob(path)? {
            Some(blob) => Slot::Key(blob.object_id()),
            None => Slot::Deleted,
        };

        self.entry_mut(path)?.wdir = wdir;
        self.changed = true;

        Ok(())
    }

    /// Refresh the `wdir` slot of every tracked path
    pub fn update_all(&mut self, workspace: &Workspace) -> anyhow::Result<()> {
        if self.updated {
            return Err(RepositoryError::IndexAlreadyUpdated.into());
        }

        let paths = self.entries.keys().cloned().collect::<Vec<_>>();
        for path in &paths {
            self.update_wdir(path, workspace)?;
        }
        self.updated = true;

        Ok(())
    }

    /// `stage := wdir`
    pub fn stage(&mut self, path: &str) -> anyhow::Result<()> {
        let entry = self.entry_mut(path)?;
        entry.stage = entry.wdir;
        self.changed = true;

        Ok(())
    }

    /// `repo := stage`
    pub fn commit(&mut self, path: &str) -> anyhow::Result<()> {
        let entry = self.entry_mut(path)?;
        entry.repo = entry.stage;
        self.changed = true;

        Ok(())
    }

    /// Point all three slots at the same blob
    pub fn set_all(&mut self, path: &str, key: HashKey) -> anyhow::Result<()> {
        let entry = self.entry_mut(path)?;
        entry.wdir = Slot::Key(key);
        entry.stage = Slot::Key(key);
        entry.repo = Slot::Key(key);
        self.changed = true;

        Ok(())
    }

    pub fn clear_repo(&mut self, path: &str) -> anyhow::Result<()> {
        self.entry_mut(path)?.repo = Slot::Unset;
        self.changed = true;

        Ok(())
    }

    pub fn clear_stage_and_repo(&mut self, path: &str) -> anyhow::Result<()> {
        let entry = self.entry_mut(path)?;
        entry.stage = Slot::Unset;
        entry.repo = Slot::Unset;
        self.changed = true;

        Ok(())
    }

    /// Stop tracking `path`
    pub fn remove(&mut self, path: &str) -> anyhow::Result<()> {
        self.entries
            .remove(path)
            .ok_or_else(|| RepositoryError::NotTracked(path.to_string()))?;
        self.changed = true;
        tracing::debug!(path, "stopped tracking");

        Ok(())
    }

    fn entry_mut(&mut self, path: &str) -> anyhow::Result<&mut IndexEntry> {
        self.entries
            .get_mut(path)
            .ok_or_else(|| RepositoryError::NotTracked(path.to_string()).into())
    }
}

//! Branch references and HEAD
//!
//! Branches and HEAD are read lazily and cached for the life of the
//! repository handle. Changes stay in memory until [`Refs::write_updates`],
//! which runs once when the repository is closed.
//!
//! ## File Format
//!
//! - `HEAD`: the name of the current branch, or `0` in a fresh repository
//! - `refs/heads/<name>`: the 40-character hex key of the branch's commit
//!
//! A branch without a commit is never written to disk.

use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::NULL_KEY;
use crate::artifacts::objects::hash_key::HashKey;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug)]
pub struct Refs {
    /// Path to the metadata directory (typically `.twig`)
    path: Box<Path>,
    /// Current branch, `None` until the first `get_head` in a fresh repository
    head: Option<BranchName>,
    head_modified: bool,
    /// Branches read or created so far
    branches: BTreeMap<BranchName, Branch>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs {
            path,
            head: None,
            head_modified: false,
            branches: BTreeMap::new(),
        }
    }

    /// Read HEAD from disk and drop every cached branch
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        self.head = match content.trim() {
            NULL_KEY | "" => None,
            name => Some(
                BranchName::try_parse(name.to_string())
                    .with_context(|| format!("corrupt HEAD at {:?}", head_path))?,
            ),
        };
        self.head_modified = false;
        self.branches.clear();

        Ok(())
    }

    /// The current branch
    ///
    /// In a fresh repository this registers the default branch, without a
    /// commit, and points HEAD at it.
    pub fn get_head(&mut self) -> anyhow::Result<Branch> {
        let name = match &self.head {
            Some(name) => name.clone(),
            None => {
                let name = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
                self.head = Some(name.clone());
                self.head_modified = true;
                name
            }
        };

        if let Some(branch) = self.get_branch(&name)? {
            return Ok(branch);
        }

        let branch = Branch::new(name.clone(), None);
        self.branches.insert(name, branch.clone());
        Ok(branch)
    }

    /// Commit of the current branch, `None` before the first commit
    pub fn head_commit(&mut self) -> anyhow::Result<Option<HashKey>> {
        Ok(self.get_head()?.commit().copied())
    }

    pub fn set_head(&mut self, name: &BranchName) {
        if self.head.as_ref() != Some(name) {
            self.head = Some(name.clone());
            self.head_modified = true;
        }
    }

    /// Look up a branch, reading `refs/heads/<name>` on first access
    pub fn get_branch(&mut self, name: &BranchName) -> anyhow::Result<Option<Branch>> {
        if let Some(branch) = self.branches.get(name) {
            return Ok(Some(branch.clone()));
        }

        let Some(commit) = self.read_branch_file(name)? else {
            return Ok(None);
        };

        let branch = Branch::loaded(name.clone(), commit);
        self.branches.insert(name.clone(), branch.clone());
        Ok(Some(branch))
    }

    /// Register a new branch; it is written on the next flush
    pub fn create_branch(
        &mut self,
        name: BranchName,
        commit: Option<HashKey>,
    ) -> anyhow::Result<Branch> {
        if self.get_branch(&name)?.is_some() {
            return Err(RepositoryError::BranchExists(name.to_string()).into());
        }

        let branch = Branch::new(name.clone(), commit);
        self.branches.insert(name, branch.clone());
        Ok(branch)
    }

    /// Move a branch to `commit`, registering the branch if it is unknown
    pub fn set_branch_commit(&mut self, name: &BranchName, commit: HashKey) -> anyhow::Result<()> {
        if self.get_branch(name)?.is_none() {
            self.branches
                .insert(name.clone(), Branch::new(name.clone(), None));
        }

        if let Some(branch) = self.branches.get_mut(name) {
            branch.set_commit(commit);
        }

        Ok(())
    }

    /// Every branch on disk or in memory, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<Branch>> {
        let mut branches = BTreeMap::new();

        let heads_path = self.heads_path();
        if heads_path.exists() {
            for entry in WalkDir::new(&heads_path) {
                let entry =
                    entry.with_context(|| format!("failed to list branches in {:?}", heads_path))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative_path = entry
                    .path()
                    .strip_prefix(&heads_path)
                    .with_context(|| format!("unexpected branch path {:?}", entry.path()))?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let name = BranchName::try_parse(name)?;

                if let Some(commit) = self.read_branch_file(&name)? {
                    branches.insert(name.clone(), Branch::loaded(name, commit));
                }
            }
        }

        for (name, branch) in &self.branches {
            branches.insert(name.clone(), branch.clone());
        }

        Ok(branches.into_values().collect())
    }

    /// Persist modified branches that have a commit, then HEAD if it moved
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        for branch in self.branches.values_mut() {
            let Some(commit) = branch.commit().copied() else {
                continue;
            };
            if !branch.is_modified() {
                continue;
            }

            let branch_path = self.path.join("refs").join("heads").join(branch.name().as_ref());
            Self::update_ref_file(&branch_path, &commit.to_hex())?;
            branch.mark_flushed();
            tracing::debug!(branch = %branch.name(), %commit, "updated branch");
        }

        if self.head_modified {
            let head = self
                .head
                .as_ref()
                .map(|name| name.to_string())
                .unwrap_or_else(|| NULL_KEY.to_string());
            Self::update_ref_file(&self.head_path(), &head)?;
            self.head_modified = false;
            tracing::debug!(%head, "updated HEAD");
        }

        Ok(())
    }

    fn read_branch_file(&self, name: &BranchName) -> anyhow::Result<Option<HashKey>> {
        let branch_path = self.heads_path().join(name.as_ref());
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        HashKey::parse(content.trim())
            .map(Some)
            .with_context(|| format!("corrupt ref file at {:?}", branch_path))
    }

    fn update_ref_file(path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        std::fs::write(path, raw_ref)
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.path.join("refs").join("heads").into_boxed_path()
    }
}

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::hash_key::HashKey;

/// A named pointer to a commit
///
/// A branch created in a fresh repository has no commit until the first one
/// is made on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: BranchName,
    commit: Option<HashKey>,
    /// Changed since it was loaded, pending a flush
    modified: bool,
}

impl Branch {
    pub fn new(name: BranchName, commit: Option<HashKey>) -> Self {
        Branch {
            name,
            commit,
            modified: true,
        }
    }

    /// Branch as read from disk, nothing to flush
    pub fn loaded(name: BranchName, commit: HashKey) -> Self {
        Branch {
            name,
            commit: Some(commit),
            modified: false,
        }
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn commit(&self) -> Option<&HashKey> {
        self.commit.as_ref()
    }

    pub fn set_commit(&mut self, commit: HashKey) {
        self.commit = Some(commit);
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_flushed(&mut self) {
        self.modified = false;
    }
}

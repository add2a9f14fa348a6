//! Commit object
//!
//! A commit records a root tree, an optional parent commit and a message.
//! The parent and the tree are referenced by key and loaded on first use;
//! each in-memory commit caches what it has loaded.
//!
//! ## Format
//!
//! ```text
//! commit
//! <parent-key or 0>
//! <tree-key>
//!
//! <message>
//! ```

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::NULL_KEY;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::cell::OnceCell;
use std::io::BufRead;

#[derive(Debug, Clone)]
pub struct Commit {
    parent: Option<HashKey>,
    tree: HashKey,
    message: String,
    key: HashKey,
    loaded_tree: OnceCell<Tree>,
    loaded_parent: OnceCell<Box<Commit>>,
}

impl Commit {
    pub fn new(parent: Option<HashKey>, tree: HashKey, message: impl Into<String>) -> Self {
        let message = message.into();
        let key = HashKey::hash(Self::pack(parent.as_ref(), &tree, &message).as_bytes());

        Commit {
            parent,
            tree,
            message,
            key,
            loaded_tree: OnceCell::new(),
            loaded_parent: OnceCell::new(),
        }
    }

    pub fn parent(&self) -> Option<&HashKey> {
        self.parent.as_ref()
    }

    pub fn tree_key(&self) -> &HashKey {
        &self.tree
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Root tree of this commit, read from the database on first call
    pub fn load_tree(&self, database: &Database) -> anyhow::Result<&Tree> {
        if let Some(tree) = self.loaded_tree.get() {
            return Ok(tree);
        }

        let tree = database
            .retrieve_tree(&self.tree)?
            .with_context(|| format!("tree {} of commit {} is missing", self.tree, self.key))?;

        Ok(self.loaded_tree.get_or_init(|| tree))
    }

    /// Parent commit, read from the database on first call
    ///
    /// # Returns
    ///
    /// `None` for the root commit
    pub fn load_parent(&self, database: &Database) -> anyhow::Result<Option<&Commit>> {
        let Some(parent_key) = &self.parent else {
            return Ok(None);
        };

        if let Some(parent) = self.loaded_parent.get() {
            return Ok(Some(parent));
        }

        let parent = database
            .retrieve_commit(parent_key)?
            .with_context(|| format!("parent {} of commit {} is missing", parent_key, self.key))?;

        Ok(Some(self.loaded_parent.get_or_init(|| Box::new(parent))))
    }

    /// Switch the working directory and index to this commit's tree
    ///
    /// Fails without touching anything when a local change would be lost.
    pub fn checkout(
        &self,
        database: &Database,
        workspace: &Workspace,
        index: &mut Index,
        current: Option<&HashKey>,
    ) -> anyhow::Result<()> {
        Migration::new(database, workspace, index).apply(current, self)
    }

    fn pack(parent: Option<&HashKey>, tree: &HashKey, message: &str) -> String {
        let parent = parent
            .map(HashKey::to_hex)
            .unwrap_or_else(|| NULL_KEY.to_string());

        format!(
            "{}\n{}\n{}\n\n{}",
            ObjectType::Commit.as_str(),
            parent,
            tree,
            message
        )
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Commit {}

impl Packable for Commit {
    fn serialize(&self) -> Bytes {
        Bytes::from(Self::pack(self.parent.as_ref(), &self.tree, &self.message))
    }
}

impl Unpackable for Commit {
    const OBJECT_TYPE: ObjectType = ObjectType::Commit;

    fn deserialize(header: &str, mut reader: impl BufRead) -> anyhow::Result<Option<Self>> {
        if !header.is_empty() {
            return Ok(None);
        }

        let mut next_line = || -> anyhow::Result<Option<String>> {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 || !line.ends_with('\n') {
                return Ok(None);
            }
            line.pop();
            Ok(Some(line))
        };

        let (Some(parent), Some(tree), Some(blank)) = (next_line()?, next_line()?, next_line()?)
        else {
            return Ok(None);
        };
        if !blank.is_empty() {
            return Ok(None);
        }

        let parent = match parent.as_str() {
            NULL_KEY => None,
            hex => match HashKey::parse(hex) {
                Ok(key) => Some(key),
                Err(_) => return Ok(None),
            },
        };
        let Ok(tree) = HashKey::parse(&tree) else {
            return Ok(None);
        };

        let mut message = String::new();
        reader.read_to_string(&mut message)?;

        Ok(Some(Commit::new(parent, tree, message)))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> HashKey {
        self.key
    }
}

//! Tree object
//!
//! Trees are immutable directory snapshots. A tree refers to its files and
//! sub-directories only by key, so its own key changes whenever anything below
//! it changes.
//!
//! ## Format
//!
//! ```text
//! tree <dirname>
//! blob <key> <filename>
//! tree <key> <dirname>
//! ```
//!
//! Blob lines come first, then tree lines, each group sorted by name.
//!
//! ## Loading
//!
//! Children are resolved one level at a time through the [`Database`], so only
//! the sub-trees on the walked path are ever read from disk.

use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Name given to the tree at the repository root
pub const ROOT_TREE_NAME: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    name: String,
    blobs: BTreeMap<String, HashKey>,
    subtrees: BTreeMap<String, HashKey>,
    key: HashKey,
}

impl Tree {
    pub fn new(
        name: impl Into<String>,
        blobs: BTreeMap<String, HashKey>,
        subtrees: BTreeMap<String, HashKey>,
    ) -> Self {
        let name = name.into();
        let key = HashKey::hash(&Self::pack(&name, &blobs, &subtrees));

        Tree {
            name,
            blobs,
            subtrees,
            key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blobs(&self) -> &BTreeMap<String, HashKey> {
        &self.blobs
    }

    pub fn subtrees(&self) -> &BTreeMap<String, HashKey> {
        &self.subtrees
    }

    /// Find the blob stored at `path`, relative to this tree
    ///
    /// # Returns
    ///
    /// `None` when some component of the path does not exist
    pub fn find_blob(&self, database: &Database, path: &str) -> anyhow::Result<Option<Blob>> {
        let (dir, file_name) = match path.rsplit_once('/') {
            Some((dir, file_name)) => (Some(dir), file_name),
            None => (None, path),
        };

        let parent = match dir {
            Some(dir) => match self.find_subtree(database, dir)? {
                Some(parent) => parent,
                None => return Ok(None),
            },
            None => self.clone(),
        };

        match parent.blobs.get(file_name) {
            Some(key) => database
                .retrieve_blob(key)?
                .with_context(|| format!("blob {} for {} is missing", key, path))
                .map(Some),
            None => Ok(None),
        }
    }

    /// Find the sub-tree for the directory at `path`, relative to this tree
    ///
    /// An empty path or `.` names this tree itself.
    pub fn find_subtree(&self, database: &Database, path: &str) -> anyhow::Result<Option<Tree>> {
        let mut current = self.clone();

        for component in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
            let Some(key) = current.subtrees.get(component) else {
                return Ok(None);
            };

            current = Self::load(database, key)?;
        }

        Ok(Some(current))
    }

    /// Load every blob reachable from this tree, depth-first
    pub fn collect_all_blobs(&self, database: &Database) -> anyhow::Result<Vec<Blob>> {
        let mut blobs = Vec::new();
        self.collect_blobs_into(database, &mut blobs)?;

        Ok(blobs)
    }

    fn collect_blobs_into(&self, database: &Database, blobs: &mut Vec<Blob>) -> anyhow::Result<()> {
        for (name, key) in &self.blobs {
            let blob = database
                .retrieve_blob(key)?
                .with_context(|| format!("blob {} for {} is missing", key, name))?;
            blobs.push(blob);
        }

        for key in self.subtrees.values() {
            Self::load(database, key)?.collect_blobs_into(database, blobs)?;
        }

        Ok(())
    }

    fn load(database: &Database, key: &HashKey) -> anyhow::Result<Tree> {
        database
            .retrieve_tree(key)?
            .with_context(|| format!("tree {} is missing", key))
    }

    fn pack(
        name: &str,
        blobs: &BTreeMap<String, HashKey>,
        subtrees: &BTreeMap<String, HashKey>,
    ) -> Vec<u8> {
        let mut content = format!("{} {}\n", ObjectType::Tree.as_str(), name);

        for (file_name, key) in blobs {
            content.push_str(&format!("{} {} {}\n", ObjectType::Blob, key, file_name));
        }
        for (dir_name, key) in subtrees {
            content.push_str(&format!("{} {} {}\n", ObjectType::Tree, key, dir_name));
        }

        content.into_bytes()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Bytes {
        Bytes::from(Self::pack(&self.name, &self.blobs, &self.subtrees))
    }
}

impl Unpackable for Tree {
    const OBJECT_TYPE: ObjectType = ObjectType::Tree;

    fn deserialize(header: &str, reader: impl BufRead) -> anyhow::Result<Option<Self>> {
        if header.is_empty() {
            return Ok(None);
        }

        let mut blobs = BTreeMap::new();
        let mut subtrees = BTreeMap::new();

        for line in reader.lines() {
            let line = line?;
            let mut items = line.splitn(3, ' ');

            let (Some(tag), Some(hex), Some(name)) = (items.next(), items.next(), items.next())
            else {
                return Ok(None);
            };
            let Ok(key) = HashKey::parse(hex) else {
                return Ok(None);
            };

            match ObjectType::try_from(tag) {
                Ok(ObjectType::Blob) => blobs.insert(name.to_string(), key),
                Ok(ObjectType::Tree) => subtrees.insert(name.to_string(), key),
                _ => return Ok(None),
            };
        }

        Ok(Some(Tree::new(header, blobs, subtrees)))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn object_id(&self) -> HashKey {
        self.key
    }
}

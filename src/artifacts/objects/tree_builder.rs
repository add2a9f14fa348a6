//! Tree assembly for new commits
//!
//! A [`TreeBuilder`] collects a flat set of `(path, blob key)` pairs into a trie
//! keyed by directory name. It has no key of its own: a directory's key depends
//! on the keys of everything below it, so hashing only happens in
//! [`TreeBuilder::finish`], which consumes the builder and hashes bottom-up into
//! a [`BuiltTree`] of immutable [`Tree`] nodes. Nothing can be added after that.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::{ROOT_TREE_NAME, Tree};
use derive_new::new;
use std::collections::BTreeMap;

/// A blob referenced from a built tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct BlobEntry {
    /// Repository-relative path of the file
    pub path: String,
    pub key: HashKey,
}

#[derive(Debug)]
pub struct TreeBuilder {
    name: String,
    blobs: BTreeMap<String, BlobEntry>,
    subtrees: BTreeMap<String, TreeBuilder>,
}

impl TreeBuilder {
    pub fn root() -> Self {
        Self::named(ROOT_TREE_NAME)
    }

    fn named(name: &str) -> Self {
        TreeBuilder {
            name: name.to_string(),
            blobs: BTreeMap::new(),
            subtrees: BTreeMap::new(),
        }
    }

    /// Build a complete hierarchy from a flat list of entries
    pub fn build(entries: impl IntoIterator<Item = BlobEntry>) -> anyhow::Result<BuiltTree> {
        let mut root = Self::root();

        for entry in entries {
            root.add_entry(entry)?;
        }

        Ok(root.finish())
    }

    pub fn add_blob(&mut self, blob: &Blob) -> anyhow::Result<()> {
        self.add_entry(BlobEntry::new(blob.path().to_string(), blob.object_id()))
    }

    /// Insert an entry, creating the intermediate directories on demand
    pub fn add_entry(&mut self, entry: BlobEntry) -> anyhow::Result<()> {
        let components = entry.path.split('/').collect::<Vec<_>>();
        if components.iter().any(|c| c.is_empty() || *c == "." || *c == "..") {
            anyhow::bail!("invalid path for tree entry: {:?}", entry.path);
        }

        let (file_name, parents) = components
            .split_last()
            .ok_or_else(|| anyhow::anyhow!("empty path for tree entry"))?;

        let mut node = self;
        for parent in parents {
            if node.blobs.contains_key(*parent) {
                anyhow::bail!("{} is both a file and a directory", entry.path);
            }
            node = node
                .subtrees
                .entry(parent.to_string())
                .or_insert_with(|| Self::named(parent));
        }

        if node.subtrees.contains_key(*file_name) {
            anyhow::bail!("{} is both a file and a directory", entry.path);
        }
        node.blobs.insert(file_name.to_string(), entry);

        Ok(())
    }

    /// Hash every node bottom-up and freeze the hierarchy
    pub fn finish(self) -> BuiltTree {
        let subtrees = self
            .subtrees
            .into_values()
            .map(TreeBuilder::finish)
            .collect::<Vec<_>>();

        let blob_keys = self
            .blobs
            .iter()
            .map(|(name, entry)| (name.clone(), entry.key))
            .collect();
        let subtree_keys = subtrees
            .iter()
            .map(|subtree| (subtree.tree.name().to_string(), subtree.tree.object_id()))
            .collect();

        BuiltTree {
            tree: Tree::new(self.name, blob_keys, subtree_keys),
            blobs: self.blobs.into_values().collect(),
            subtrees,
        }
    }
}

/// Finished, hashed hierarchy produced by [`TreeBuilder::finish`]
#[derive(Debug)]
pub struct BuiltTree {
    tree: Tree,
    blobs: Vec<BlobEntry>,
    subtrees: Vec<BuiltTree>,
}

impl BuiltTree {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn object_id(&self) -> HashKey {
        self.tree.object_id()
    }

    /// Visit every tree node, children before their parent
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for subtree in &self.subtrees {
            subtree.traverse(func)?;
        }
        func(&self.tree)
    }

    /// Every blob entry and every tree node in the hierarchy, root included
    pub fn collect_all_blobs_and_subtrees(&self) -> (Vec<&BlobEntry>, Vec<&Tree>) {
        let mut blobs = Vec::new();
        let mut trees = Vec::new();
        self.collect_into(&mut blobs, &mut trees);

        (blobs, trees)
    }

    fn collect_into<'t>(&'t self, blobs: &mut Vec<&'t BlobEntry>, trees: &mut Vec<&'t Tree>) {
        blobs.extend(self.blobs.iter());
        for subtree in &self.subtrees {
            subtree.collect_into(blobs, trees);
        }
        trees.push(&self.tree);
    }
}

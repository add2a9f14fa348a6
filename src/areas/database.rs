use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::tree_builder::BuiltTree;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write-once, content-addressed store of serialized objects
///
/// Each object lives in `objects/<hex key>`. A key names exactly one
/// serialized form, so an existing file is never rewritten.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, key: &HashKey) -> bool {
        self.object_path(key).exists()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<HashKey> {
        let key = object.object_id();

        if self.contains(&key) {
            tracing::debug!(%key, object_type = %object.object_type(), "object already stored");
            return Ok(key);
        }

        self.write_object(&self.object_path(&key), object.serialize())?;
        tracing::debug!(%key, object_type = %object.object_type(), "stored object");

        Ok(key)
    }

    /// Persist every tree of a finished hierarchy, then the commit pointing at its root
    pub fn store_commit_with_tree(
        &self,
        commit: &Commit,
        tree: &BuiltTree,
    ) -> anyhow::Result<HashKey> {
        anyhow::ensure!(
            commit.tree_key() == &tree.object_id(),
            "commit {} does not point at tree {}",
            commit.object_id(),
            tree.object_id()
        );

        tree.traverse(&mut |node: &Tree| self.store(node).map(|_| ()))?;

        self.store(commit)
    }

    pub fn retrieve_blob(&self, key: &HashKey) -> anyhow::Result<Option<Blob>> {
        self.retrieve(key)
    }

    pub fn retrieve_tree(&self, key: &HashKey) -> anyhow::Result<Option<Tree>> {
        self.retrieve(key)
    }

    pub fn retrieve_commit(&self, key: &HashKey) -> anyhow::Result<Option<Commit>> {
        self.retrieve(key)
    }

    fn retrieve<T: Unpackable>(&self, key: &HashKey) -> anyhow::Result<Option<T>> {
        let Some(content) = self.read_object(key)? else {
            tracing::debug!(%key, "object not found");
            return Ok(None);
        };

        let object = T::parse(&content)?;
        if object.is_none() {
            let expected = T::OBJECT_TYPE;
            tracing::debug!(%key, %expected, "object has a different type or is malformed");
        }

        Ok(object)
    }

    fn object_path(&self, key: &HashKey) -> PathBuf {
        self.path.join(key.to_hex())
    }

    fn read_object(&self, key: &HashKey) -> anyhow::Result<Option<Bytes>> {
        let object_path = self.object_path(key);

        match std::fs::read(&object_path) {
            Ok(content) => Ok(Some(content.into())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context(format!(
                "Unable to read object file {}",
                object_path.display()
            )),
        }
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path).context(format!(
            "Unable to create objects directory {}",
            self.path.display()
        ))?;
        let temp_object_path = self.path.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

//! Blob object
//!
//! A blob is a snapshot of one file: its repository-relative path and its raw
//! bytes. The key covers the header too, so the same bytes stored under two
//! different paths are two different objects.
//!
//! ## Format
//!
//! ```text
//! blob <path>
//! <raw content>
//! ```

use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::BufRead;

/// Immutable file snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Repository-relative path with `/` separators
    path: String,
    /// Raw file content
    content: Bytes,
    key: HashKey,
}

impl Blob {
    pub fn new(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let path = path.into();
        let content = content.into();
        let key = HashKey::hash(&Self::pack(&path, &content));

        Blob { path, content, key }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path component
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    fn pack(path: &str, content: &[u8]) -> Vec<u8> {
        let header = format!("{} {}\n", ObjectType::Blob.as_str(), path);

        let mut blob_bytes = Vec::with_capacity(header.len() + content.len());
        blob_bytes.extend_from_slice(header.as_bytes());
        blob_bytes.extend_from_slice(content);
        blob_bytes
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Bytes {
        Bytes::from(Self::pack(&self.path, &self.content))
    }
}

impl Unpackable for Blob {
    const OBJECT_TYPE: ObjectType = ObjectType::Blob;

    fn deserialize(header: &str, mut reader: impl BufRead) -> anyhow::Result<Option<Self>> {
        // the header has already been read, it must carry a path
        if header.is_empty() {
            return Ok(None);
        }

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Some(Blob::new(header, content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn object_id(&self) -> HashKey {
        self.key
    }
}

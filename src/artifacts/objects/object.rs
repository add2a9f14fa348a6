use crate::artifacts::objects::hash_key::HashKey;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::{BufRead, Cursor};

pub trait Packable {
    fn serialize(&self) -> Bytes;
}

pub trait Unpackable {
    const OBJECT_TYPE: ObjectType;

    /// Build the object from the remainder of its header line and its body
    ///
    /// Returns `None` for structurally invalid content.
    fn deserialize(header: &str, reader: impl BufRead) -> anyhow::Result<Option<Self>>
    where
        Self: Sized;

    /// Parse a complete serialized object, rejecting any other type tag
    fn parse(content: &[u8]) -> anyhow::Result<Option<Self>>
    where
        Self: Sized,
    {
        let mut reader = Cursor::new(content);

        match ObjectType::parse_header(&mut reader)? {
            Some((object_type, header)) if object_type == Self::OBJECT_TYPE => {
                Self::deserialize(&header, reader)
            }
            _ => Ok(None),
        }
    }
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Key of the serialized form, computed once when the object is built
    fn object_id(&self) -> HashKey;
}

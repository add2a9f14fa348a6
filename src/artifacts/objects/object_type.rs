use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Read the header line of a serialized object
    ///
    /// Returns the type tag and whatever follows it on the first line
    /// (the blob path or the tree directory name; empty for commits).
    /// `None` when the first line does not start with a known tag.
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<Option<(Self, String)>> {
        let mut header = Vec::new();
        data_reader.read_until(b'\n', &mut header)?;

        if header.last() != Some(&b'\n') {
            return Ok(None);
        }
        header.pop();

        let Ok(header) = String::from_utf8(header) else {
            return Ok(None);
        };
        let (tag, rest) = match header.split_once(' ') {
            Some((tag, rest)) => (tag, rest.to_string()),
            None => (header.as_str(), String::new()),
        };

        Ok(ObjectType::try_from(tag).ok().map(|object_type| (object_type, rest)))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

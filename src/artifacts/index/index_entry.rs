//! Index entry representation

use crate::artifacts::index::DELETED_SLOT;
use crate::artifacts::objects::NULL_KEY;
use crate::artifacts::objects::hash_key::HashKey;
use std::fmt;

/// Content of one of the three per-file slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Unset,
    /// The file is known to be gone
    Deleted,
    Key(HashKey),
}

impl Slot {
    pub fn is_set(&self) -> bool {
        !matches!(self, Slot::Unset)
    }

    pub fn key(&self) -> Option<&HashKey> {
        match self {
            Slot::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        match text {
            NULL_KEY => Ok(Slot::Unset),
            DELETED_SLOT => Ok(Slot::Deleted),
            hex => HashKey::parse(hex).map(Slot::Key),
        }
    }
}

impl From<HashKey> for Slot {
    fn from(key: HashKey) -> Self {
        Slot::Key(key)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Unset => write!(f, "{}", NULL_KEY),
            Slot::Deleted => write!(f, "{}", DELETED_SLOT),
            Slot::Key(key) => write!(f, "{}", key),
        }
    }
}

/// Tracking state of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Repository-relative path
    pub path: String,
    pub wdir: Slot,
    pub stage: Slot,
    pub repo: Slot,
}

impl IndexEntry {
    /// Freshly tracked file, every slot unset
    pub fn new(path: impl Into<String>) -> Self {
        IndexEntry {
            path: path.into(),
            wdir: Slot::Unset,
            stage: Slot::Unset,
            repo: Slot::Unset,
        }
    }

    /// Parse one line of the index file
    ///
    /// The slots are split off the end so the path may contain spaces.
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let mut items = line.rsplitn(4, ' ');

        let (Some(repo), Some(stage), Some(wdir), Some(path)) =
            (items.next(), items.next(), items.next(), items.next())
        else {
            anyhow::bail!("malformed index entry: {:?}", line);
        };
        anyhow::ensure!(!path.is_empty(), "index entry without a path: {:?}", line);

        Ok(IndexEntry {
            path: path.to_string(),
            wdir: Slot::parse(wdir)?,
            stage: Slot::parse(stage)?,
            repo: Slot::parse(repo)?,
        })
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.path, self.wdir, self.stage, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn line_keeps_paths_with_spaces() {
        let key = HashKey::hash(b"content");
        let entry = IndexEntry {
            path: "my dir/a file.txt".to_string(),
            wdir: Slot::Deleted,
            stage: Slot::Key(key),
            repo: Slot::Unset,
        };

        let line = entry.to_string();
        assert_eq!(line, format!("my dir/a file.txt - {} 0", key));
        assert_eq!(IndexEntry::parse(&line).unwrap(), entry);
    }

    #[rstest]
    #[case::too_few_fields("a.txt 0 0")]
    #[case::bad_slot("a.txt 0 0 xyz")]
    #[case::empty_path(" 0 0 0")]
    fn rejects_malformed_lines(#[case] line: &str) {
        assert!(IndexEntry::parse(line).is_err());
    }

    #[test]
    fn only_unset_counts_as_unset() {
        assert!(!Slot::Unset.is_set());
        assert!(Slot::Deleted.is_set());
        assert!(Slot::from(HashKey::hash(b"x")).is_set());
    }
}

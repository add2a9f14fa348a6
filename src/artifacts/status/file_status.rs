use crate::artifacts::index::index_entry::{IndexEntry, Slot};
use colored::{ColoredString, Colorize};

const LABEL_WIDTH: usize = 8;

/// Where a file stands relative to the working directory, the stage and HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileStatus {
    /// Not in the index
    Untracked,
    /// Same content in all three areas
    Committed,
    /// Working copy staged, differs from HEAD
    Staged,
    /// Gone from the working directory
    Deleted,
    /// Working copy differs from the stage
    Modified,
    /// Tracked, but in no other category
    Ignored,
}

impl FileStatus {
    /// Classify a path from its index entry
    ///
    /// Conditions are checked in order and the first match wins.
    pub fn resolve(entry: Option<&IndexEntry>) -> Self {
        match entry {
            None => FileStatus::Untracked,
            Some(entry) => Self::from_slots(&entry.wdir, &entry.stage, &entry.repo),
        }
    }

    pub fn from_slots(wdir: &Slot, stage: &Slot, repo: &Slot) -> Self {
        let all_set = wdir.is_set() && stage.is_set() && repo.is_set();

        if all_set && wdir == stage && stage == repo {
            FileStatus::Committed
        } else if wdir.is_set() && stage.is_set() && wdir == stage && stage != repo {
            FileStatus::Staged
        } else if *wdir == Slot::Deleted {
            FileStatus::Deleted
        } else if wdir.is_set() && wdir != stage {
            FileStatus::Modified
        } else {
            FileStatus::Ignored
        }
    }

    /// Label used in the status listing
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Untracked => "",
            FileStatus::Committed => "",
            FileStatus::Staged => "staged:     ",
            FileStatus::Deleted => "deleted:    ",
            FileStatus::Modified => "modified:   ",
            FileStatus::Ignored => "",
        }
    }

    fn colored_label(&self) -> ColoredString {
        match self {
            FileStatus::Staged => self.label().green(),
            FileStatus::Deleted | FileStatus::Modified => self.label().red(),
            _ => self.label().normal(),
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>width$}{}", "", self.colored_label(), width = LABEL_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::hash_key::HashKey;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn key(content: &str) -> Slot {
        Slot::Key(HashKey::hash(content.as_bytes()))
    }

    fn entry(wdir: Slot, stage: Slot, repo: Slot) -> IndexEntry {
        IndexEntry {
            path: "a.txt".to_string(),
            wdir,
            stage,
            repo,
        }
    }

    #[test]
    fn missing_entry_is_untracked() {
        assert_eq!(FileStatus::resolve(None), FileStatus::Untracked);
    }

    #[rstest]
    #[case::committed(key("a"), key("a"), key("a"), FileStatus::Committed)]
    #[case::newly_staged(key("a"), key("a"), Slot::Unset, FileStatus::Staged)]
    #[case::staged_edit(key("b"), key("b"), key("a"), FileStatus::Staged)]
    #[case::staged_deletion(Slot::Deleted, Slot::Deleted, key("a"), FileStatus::Staged)]
    #[case::deleted(Slot::Deleted, key("a"), key("a"), FileStatus::Deleted)]
    #[case::deleted_before_staging(Slot::Deleted, Slot::Unset, Slot::Unset, FileStatus::Deleted)]
    #[case::modified(key("b"), key("a"), key("a"), FileStatus::Modified)]
    #[case::never_staged(key("a"), Slot::Unset, Slot::Unset, FileStatus::Modified)]
    #[case::fresh_entry(Slot::Unset, Slot::Unset, Slot::Unset, FileStatus::Ignored)]
    #[case::unscanned(Slot::Unset, key("a"), key("a"), FileStatus::Ignored)]
    fn first_matching_row_wins(
        #[case] wdir: Slot,
        #[case] stage: Slot,
        #[case] repo: Slot,
        #[case] expected: FileStatus,
    ) {
        let entry = entry(wdir, stage, repo);

        assert_eq!(FileStatus::resolve(Some(&entry)), expected);
    }

    fn slot() -> impl Strategy<Value = Slot> {
        prop_oneof![
            Just(Slot::Unset),
            Just(Slot::Deleted),
            (0u8..3).prop_map(|n| Slot::Key(HashKey::hash(&[n]))),
        ]
    }

    proptest! {
        #[test]
        fn tracked_entries_never_resolve_to_untracked(wdir in slot(), stage in slot(), repo in slot()) {
            let entry = entry(wdir, stage, repo);

            prop_assert_ne!(FileStatus::resolve(Some(&entry)), FileStatus::Untracked);
        }

        #[test]
        fn resolution_is_a_pure_function_of_the_slots(wdir in slot(), stage in slot(), repo in slot()) {
            let entry = entry(wdir, stage, repo);

            prop_assert_eq!(
                FileStatus::resolve(Some(&entry)),
                FileStatus::from_slots(&wdir, &stage, &repo)
            );
        }
    }
}

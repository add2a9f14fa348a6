use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::hash_key::HashKey;
use anyhow::Context;
use derive_new::new;

/// Walk of the commit chain ending at `start`, newest first
#[derive(Clone, new)]
pub struct RevList<'r> {
    database: &'r Database,
    start: Option<HashKey>,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> anyhow::Result<RevListIntoIter<'r>> {
        let current = match &self.start {
            Some(key) => Some(
                self.database
                    .retrieve_commit(key)?
                    .with_context(|| format!("commit {} is missing", key))?,
            ),
            None => None,
        };

        Ok(RevListIntoIter {
            database: self.database,
            current,
        })
    }
}

pub struct RevListIntoIter<'r> {
    database: &'r Database,
    current: Option<Commit>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = self.current.take()?;

        match commit.load_parent(self.database) {
            Ok(parent) => {
                // Move to the parent commit for the next iteration
                self.current = parent.cloned();
                Some(Ok(commit))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

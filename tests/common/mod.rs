#![allow(dead_code)]

pub mod command;
pub mod file;

use std::path::Path;
use twig::areas::repository::Repository;

/// Open the repository, run one command and close it, as one process would
pub fn with_repository<T>(
    dir: &Path,
    command: impl FnOnce(&mut Repository) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let mut repository = Repository::open(dir, Box::new(std::io::sink()))?;
    let result = command(&mut repository)?;
    repository.close()?;

    Ok(result)
}

pub fn init_repository(dir: &Path) {
    Repository::new(dir, Box::new(std::io::sink()))
        .and_then(|mut repository| repository.init())
        .expect("Failed to initialize repository");
}

/// Raw content of a file under the metadata directory
pub fn read_metadata(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(".twig").join(name))
        .unwrap_or_else(|e| panic!("Failed to read .twig/{}: {}", name, e))
}

pub fn count_objects(dir: &Path) -> usize {
    std::fs::read_dir(dir.join(".twig").join("objects"))
        .expect("Failed to list objects")
        .count()
}

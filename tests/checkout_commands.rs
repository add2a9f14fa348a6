use assert_fs::TempDir;
use common::command::repository_dir;
use common::file::{FileSpec, read_file, remove_file, write_file};
use common::{init_repository, read_metadata, with_repository};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::path::Path;
use twig::artifacts::core::error::RepositoryError;
use twig::artifacts::status::file_status::FileStatus;

mod common;

fn write(dir: &Path, path: &str, content: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));
}

fn add_and_commit(dir: &Path, message: &str) {
    with_repository(dir, |repository| {
        repository.add(&[".".to_string()])?;
        repository.commit(message)
    })
    .unwrap();
}

fn checkout(dir: &Path, branch: &str) -> anyhow::Result<()> {
    with_repository(dir, |repository| repository.checkout(branch))
}

/// `master` holds `1.txt` and `a/2.txt`; `feature` adds `a/b/3.txt` and edits `1.txt`.
/// HEAD is left on `feature`.
#[fixture]
fn two_branches(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    init_repository(dir);

    write(dir, "1.txt", "one");
    write(dir, "a/2.txt", "two");
    add_and_commit(dir, "base");

    with_repository(dir, |repository| repository.branch("feature")).unwrap();
    checkout(dir, "feature").unwrap();

    write(dir, "1.txt", "one, reworked");
    write(dir, "a/b/3.txt", "three");
    add_and_commit(dir, "feature work");

    repository_dir
}

#[rstest]
fn switching_branches_rewrites_the_working_directory(two_branches: TempDir) {
    let dir = two_branches.path();

    checkout(dir, "master").unwrap();

    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert_eq!(read_file(&dir.join("a/2.txt")), "two");
    assert!(!dir.join("a/b/3.txt").exists());
    assert!(!dir.join("a/b").exists());
    assert_eq!(read_metadata(dir, "HEAD"), "master");

    checkout(dir, "feature").unwrap();

    assert_eq!(read_file(&dir.join("1.txt")), "one, reworked");
    assert_eq!(read_file(&dir.join("a/b/3.txt")), "three");
    assert_eq!(read_metadata(dir, "HEAD"), "feature");

    let statuses = with_repository(dir, |repository| repository.status()).unwrap();
    assert!(
        statuses
            .values()
            .all(|status| *status == FileStatus::Committed)
    );
}

#[rstest]
fn blocked_checkout_changes_nothing(two_branches: TempDir) {
    let dir = two_branches.path();
    write(dir, "1.txt", "uncommitted edit");
    let index_before = read_metadata(dir, "index");

    let error = checkout(dir, "master").unwrap_err();

    assert_eq!(
        error.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::CheckoutBlocked(vec!["1.txt".to_string()]))
    );
    assert_eq!(read_file(&dir.join("1.txt")), "uncommitted edit");
    assert_eq!(read_file(&dir.join("a/b/3.txt")), "three");
    assert_eq!(read_metadata(dir, "HEAD"), "feature");
    assert_eq!(read_metadata(dir, "index"), index_before);
}

#[rstest]
fn staged_changes_block_checkout_too(two_branches: TempDir) {
    let dir = two_branches.path();
    write(dir, "a/2.txt", "staged edit");
    with_repository(dir, |repository| {
        repository.add(&["a/2.txt".to_string()])
    })
    .unwrap();

    let error = checkout(dir, "master").unwrap_err();

    assert_eq!(
        error.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::CheckoutBlocked(vec!["a/2.txt".to_string()]))
    );
    assert_eq!(read_metadata(dir, "HEAD"), "feature");
}

#[rstest]
fn local_changes_outside_the_target_survive(two_branches: TempDir) {
    let dir = two_branches.path();
    write(dir, "a/b/3.txt", "edited, not staged");
    write(dir, "notes.txt", "untracked");

    checkout(dir, "master").unwrap();

    assert_eq!(read_file(&dir.join("a/b/3.txt")), "edited, not staged");
    assert_eq!(read_file(&dir.join("notes.txt")), "untracked");
    assert_eq!(read_file(&dir.join("1.txt")), "one");

    let statuses = with_repository(dir, |repository| repository.status()).unwrap();
    assert_eq!(statuses.get("a/b/3.txt"), Some(&FileStatus::Modified));
    assert_eq!(statuses.get("notes.txt"), Some(&FileStatus::Untracked));
    assert_eq!(statuses.get("1.txt"), Some(&FileStatus::Committed));
}

#[rstest]
fn committed_deletion_is_restored_by_the_other_branch(two_branches: TempDir) {
    let dir = two_branches.path();
    remove_file(&dir.join("a/2.txt"));
    add_and_commit(dir, "drop 2.txt");
    assert!(!dir.join("a/2.txt").exists());

    checkout(dir, "master").unwrap();
    assert_eq!(read_file(&dir.join("a/2.txt")), "two");

    checkout(dir, "feature").unwrap();
    assert!(!dir.join("a/2.txt").exists());
}

#[rstest]
fn checking_out_the_current_branch_is_a_no_op(two_branches: TempDir) {
    let dir = two_branches.path();
    write(dir, "1.txt", "uncommitted edit");

    checkout(dir, "feature").unwrap();

    assert_eq!(read_file(&dir.join("1.txt")), "uncommitted edit");
    assert_eq!(read_metadata(dir, "HEAD"), "feature");
}

#[rstest]
#[case::unknown("nope")]
#[case::invalid("bad..name")]
fn unknown_branches_are_rejected(two_branches: TempDir, #[case] name: &str) {
    let error = checkout(two_branches.path(), name).unwrap_err();

    assert_eq!(
        error.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::UnknownBranch(name.to_string()))
    );
}

/// `master` holds a directory `a/` with `x.txt`; `file-a` holds a file `a`
/// instead. Both carry their own `0.txt`. HEAD is left on `master`.
#[fixture]
fn file_and_directory(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    init_repository(dir);

    write(dir, "0.txt", "base");
    write(dir, "a", "a file");
    add_and_commit(dir, "a as a file");
    with_repository(dir, |repository| repository.branch("file-a")).unwrap();

    remove_file(&dir.join("a"));
    write(dir, "a/x.txt", "x");
    write(dir, "0.txt", "directory side");
    add_and_commit(dir, "a as a directory");

    repository_dir
}

#[rstest]
fn committed_file_and_directory_trade_places(file_and_directory: TempDir) {
    let dir = file_and_directory.path();

    checkout(dir, "file-a").unwrap();
    assert_eq!(read_file(&dir.join("a")), "a file");
    assert_eq!(read_file(&dir.join("0.txt")), "base");

    checkout(dir, "master").unwrap();
    assert_eq!(read_file(&dir.join("a/x.txt")), "x");
    assert_eq!(read_file(&dir.join("0.txt")), "directory side");

    let statuses = with_repository(dir, |repository| repository.status()).unwrap();
    assert_eq!(statuses.keys().collect::<Vec<_>>(), vec!["0.txt", "a/x.txt"]);
}

#[rstest]
fn local_changes_under_a_replaced_directory_block_checkout(file_and_directory: TempDir) {
    let dir = file_and_directory.path();
    write(dir, "a/x.txt", "uncommitted edit");
    write(dir, "a/notes.txt", "untracked");
    let index_before = read_metadata(dir, "index");

    let error = checkout(dir, "file-a").unwrap_err();

    assert_eq!(
        error.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::CheckoutBlocked(vec![
            "a/notes.txt".to_string(),
            "a/x.txt".to_string()
        ]))
    );
    assert_eq!(read_file(&dir.join("a/x.txt")), "uncommitted edit");
    assert_eq!(read_file(&dir.join("a/notes.txt")), "untracked");
    assert_eq!(read_file(&dir.join("0.txt")), "directory side");
    assert_eq!(read_metadata(dir, "HEAD"), "master");
    assert_eq!(read_metadata(dir, "index"), index_before);
}

#[rstest]
fn local_changes_to_a_replaced_file_block_checkout(file_and_directory: TempDir) {
    let dir = file_and_directory.path();
    checkout(dir, "file-a").unwrap();
    write(dir, "a", "uncommitted edit");
    let index_before = read_metadata(dir, "index");

    let error = checkout(dir, "master").unwrap_err();

    assert_eq!(
        error.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::CheckoutBlocked(vec!["a".to_string()]))
    );
    assert_eq!(read_file(&dir.join("a")), "uncommitted edit");
    assert_eq!(read_file(&dir.join("0.txt")), "base");
    assert_eq!(read_metadata(dir, "HEAD"), "file-a");
    assert_eq!(read_metadata(dir, "index"), index_before);
}

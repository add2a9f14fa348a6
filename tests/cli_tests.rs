use assert_fs::TempDir;
use common::command::{init_repository_dir, repository_dir, run_twig_command, twig_commit};
use common::file::{FileSpec, read_file, write_file};
use predicates::prelude::*;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_the_metadata_directory(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Initialized empty twig repository in",
        ));

    assert!(repository_dir.path().join(".twig/objects").is_dir());
    assert_eq!(read_file(&repository_dir.path().join(".twig/HEAD")), "0");
}

#[rstest]
fn init_at_a_path_creates_the_directory(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init", "nested/project"])
        .assert()
        .success();

    assert!(repository_dir.path().join("nested/project/.twig").is_dir());
}

#[rstest]
fn second_init_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository already initialized"));
}

#[rstest]
#[case::status(&["status"])]
#[case::log(&["log"])]
#[case::commit(&["commit", "-m", "nothing"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a twig repository"));
}

#[rstest]
fn first_commit_is_a_root_commit(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    run_twig_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    twig_commit(repository_dir.path(), "Initial commit\n\nWith a body")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[master \(root-commit\) [0-9a-f]{7}\] Initial commit\n$")
                .unwrap(),
        );
}

#[rstest]
fn later_commits_are_not_root_commits(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "changed".to_string(),
    ));
    run_twig_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();

    twig_commit(init_repository_dir.path(), "Second commit")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Second commit\n$").unwrap(),
        );
}

#[rstest]
fn commit_with_nothing_staged_fails(init_repository_dir: TempDir) {
    twig_commit(init_repository_dir.path(), "Empty")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn add_of_an_unknown_path_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pathspec 'missing.txt' did not match any files",
        ));
}

#[rstest]
fn clean_status(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("On branch master\nnothing to commit, working tree clean\n");
}

#[rstest]
fn status_groups_changes_by_section(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "edited".to_string()));
    write_file(FileSpec::new(dir.join("a/2.txt"), "staged".to_string()));
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));
    std::fs::remove_file(dir.join("a/b/3.txt")).unwrap();
    run_twig_command(dir, &["add", "a/2.txt"]).assert().success();

    let expected = "\
On branch master
Changes to be committed:
        staged:     a/2.txt

Changes not staged for commit:
        modified:   1.txt
        deleted:    a/b/3.txt

Untracked files:
        new.txt

";

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(expected);
}

#[rstest]
fn log_lists_commits_newest_first(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("4.txt"), "four".to_string()));
    run_twig_command(dir, &["add", "4.txt"]).assert().success();
    twig_commit(dir, "Add four").assert().success();

    let output = run_twig_command(dir, &["log"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();

    let second = stdout.find("    Add four").expect("second commit missing");
    let first = stdout.find("    Initial commit").expect("first commit missing");
    assert!(second < first);
    assert_eq!(stdout.matches("commit ").count(), 2);
    assert!(stdout.contains("    1.txt\n    4.txt\n    a/2.txt\n    a/b/3.txt\n"));
}

#[rstest]
fn branch_lists_with_the_current_one_marked(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .success();

    run_twig_command(dir, &["branch"])
        .assert()
        .success()
        .stdout("* master\n  topic\n");
}

#[rstest]
#[case::empty_component("topic..x")]
#[case::lock_suffix("topic.lock")]
#[case::null_head("0")]
fn invalid_branch_names_are_rejected(init_repository_dir: TempDir, #[case] name: &str) {
    run_twig_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid branch name"));
}

#[rstest]
fn checkout_switches_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .success();

    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .success()
        .stdout("Switched to branch 'topic'\n");

    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .success()
        .stdout("Already on 'topic'\n");

    run_twig_command(dir, &["branch"])
        .assert()
        .success()
        .stdout("  master\n* topic\n");
}

#[rstest]
fn checkout_of_an_unknown_branch_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["checkout", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch 'nope' not found"));
}

#[rstest]
fn blocked_checkout_reports_the_conflicting_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .success();
    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("4.txt"), "four".to_string()));
    run_twig_command(dir, &["add", "4.txt"]).assert().success();
    twig_commit(dir, "Add four").assert().success();
    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success();
    assert!(!dir.join("4.txt").exists());

    write_file(FileSpec::new(dir.join("a/2.txt"), "local edit".to_string()));

    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "your local changes to the following files would be overwritten by checkout:\n\ta/2.txt\n",
        ));

    assert_eq!(read_file(&dir.join("a/2.txt")), "local edit");
    assert_eq!(read_file(&dir.join(".twig/HEAD")), "master");
    assert!(!dir.join("4.txt").exists());
}

#[rstest]
fn add_from_a_sub_directory(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a/b/4.txt"), "four".to_string()));

    run_twig_command(&dir.join("a/b"), &["add", "4.txt"])
        .assert()
        .success();

    run_twig_command(&dir.join("a"), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staged:     a/b/4.txt"));
}

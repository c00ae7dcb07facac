//! Integration tests for change detection against real git repositories.
//!
//! Skipped (with a note on stderr) when `git` is not installed.

use std::fs;
use std::path::Path;
use std::process::Command;

use vectorlint_action::changes::{ChangeSetResolver, Git, select_targets};
use vectorlint_action::pipeline::FileSet;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

fn git(dir: &Path, args: &[&str]) {
    let out = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create dirs");
    }
    fs::write(path, contents).expect("failed to write file");
}

/// A clone of a bare `origin` whose `feature` branch touches several files.
fn setup_repo(root: &Path) -> std::path::PathBuf {
    let origin = root.join("origin.git");
    let work = root.join("work");
    fs::create_dir_all(&origin).unwrap();
    fs::create_dir_all(&work).unwrap();

    git(&origin, &["init", "--bare", "--initial-branch=main"]);
    git(&work, &["init", "--initial-branch=main"]);
    write(&work, "README.md", "# Project\n");
    write(&work, "src/lib.rs", "pub fn a() {}\n");
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "initial"]);
    git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git(&work, &["push", "origin", "main"]);

    git(&work, &["checkout", "-b", "feature"]);
    write(&work, "docs/guide.md", "# Guide\n\nIt was written by us.\n");
    write(&work, "NOTES.MD", "upper-case extension\n");
    write(&work, "src/lib.rs", "pub fn a() {}\npub fn b() {}\n");
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "feature"]);

    work
}

#[test]
fn resolves_changed_markdown_against_base_branch() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let root = tempfile::tempdir().expect("failed to create tempdir");
    let work = setup_repo(root.path());

    let resolver = ChangeSetResolver::new(Git::in_dir(&work));
    assert_eq!(resolver.resolve("main"), vec!["docs/guide.md".to_string()]);
    assert_eq!(
        select_targets(Some("main"), &resolver),
        FileSet::Paths(vec!["docs/guide.md".into()])
    );
}

#[test]
fn unknown_base_branch_yields_no_files() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let root = tempfile::tempdir().expect("failed to create tempdir");
    let work = setup_repo(root.path());

    let resolver = ChangeSetResolver::new(Git::in_dir(&work));
    assert!(resolver.resolve("does-not-exist").is_empty());
    assert!(resolver.changed_paths("does-not-exist").is_err());
}

#[test]
fn directory_outside_a_repository_yields_no_files() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let resolver = ChangeSetResolver::new(Git::in_dir(dir.path()));
    assert!(resolver.resolve("main").is_empty());
}

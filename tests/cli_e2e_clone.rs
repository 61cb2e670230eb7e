//! End-to-end tests for `repo-watch clone`.
//!
//! These drive a real `git` against local origin repositories, so no network
//! access is needed. They skip themselves when git is not installed.

mod common;
use common::prelude::*;

#[test]
fn test_clone_requires_nickname_or_all() {
    TestFixture::new()
        .command()
        .arg("clone")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please specify a repository nickname or use --all",
        ));
}

#[test]
fn test_clone_unknown_nickname_is_not_fatal() {
    TestFixture::new()
        .with_repos(&[("a", "a", "u1", false)])
        .command()
        .arg("clone")
        .arg("nope")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repository not found in config: nope"));
}

#[test]
fn test_clone_existing_folder_is_skipped() {
    // No git needed: the folder exists, so nothing is spawned.
    TestFixture::new()
        .with_repos(&[("a", "a", "https://invalid.example/a.git", false)])
        .with_folder("a")
        .command()
        .arg("clone")
        .arg("a")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] a: Repository already exists"));
}

#[test]
fn test_clone_single_from_local_origin() {
    if !git_available() {
        eprintln!("Skipping: git not available");
        return;
    }
    let fixture = TestFixture::new();
    let origin = fixture.make_origin("one");
    let fixture = fixture.with_repos(&[("one", "one", origin.to_str().unwrap(), false)]);

    fixture
        .command()
        .arg("clone")
        .arg("one")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] one: Cloned repository"));

    assert!(fixture.root().join("one/README.md").exists());
}

#[test]
fn test_clone_all_isolates_failures() {
    if !git_available() {
        eprintln!("Skipping: git not available");
        return;
    }
    let fixture = TestFixture::new();
    let good = fixture.make_origin("good");
    let other = fixture.make_origin("other");
    let missing = fixture.path().join("origins/missing");
    let fixture = fixture.with_repos(&[
        ("good", "good", good.to_str().unwrap(), false),
        ("bad", "bad", missing.to_str().unwrap(), false),
        ("other", "other", other.to_str().unwrap(), false),
    ]);

    fixture
        .command()
        .arg("clone")
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] good: Cloned repository"))
        .stdout(predicate::str::contains("[OK] other: Cloned repository"))
        .stdout(predicate::str::contains("[FAIL] bad: Failed to clone repository"));

    assert!(fixture.root().join("good/README.md").exists());
    assert!(fixture.root().join("other/README.md").exists());
}

#[test]
fn test_clone_all_json_keeps_stdout_parseable() {
    if !git_available() {
        eprintln!("Skipping: git not available");
        return;
    }
    let fixture = TestFixture::new();
    let first = fixture.make_origin("first");
    let second = fixture.make_origin("second");
    let fixture = fixture.with_repos(&[
        ("first", "first", first.to_str().unwrap(), false),
        ("second", "second", second.to_str().unwrap(), false),
    ]);

    let output = fixture
        .command()
        .args(["--json", "clone", "--all"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let messages = parsed["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages
        .iter()
        .all(|m| m.as_str().unwrap().contains("Cloned repository")));
}

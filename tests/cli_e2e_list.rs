//! End-to-end tests for the `repo-watch list` command.

mod common;
use common::prelude::*;

#[test]
fn test_list_help() {
    cargo_bin_cmd!("repo-watch")
        .arg("list")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("List configured repositories"));
}

#[test]
fn test_list_missing_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    cargo_bin_cmd!("repo-watch")
        .env_remove("REPO_WATCH_CONFIG")
        .arg("--config")
        .arg(temp.path().join("absent.yaml"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("hint: Run 'repo-watch init'"));
}

#[test]
fn test_list_config_from_env() {
    let fixture = TestFixture::new().with_repos(&[("api", "api-server", "https://example.com/api.git", false)]);

    cargo_bin_cmd!("repo-watch")
        .env("REPO_WATCH_CONFIG", fixture.config_path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("api: https://example.com/api.git"));
}

#[test]
fn test_list_shows_state() {
    let fixture = TestFixture::new()
        .with_repos(&[
            ("api", "api-server", "https://example.com/api.git", false),
            ("web", "web", "https://example.com/web.git", true),
        ])
        .with_folder("api-server");

    fixture
        .command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("api-server (cloned)"))
        .stdout(predicate::str::contains("web (not cloned, sparse)"));
}

#[test]
fn test_list_empty_registry() {
    TestFixture::new()
        .command()
        .arg("list")
        .assert()
        .success()
        .stdout("No repositories configured\n");
}

#[test]
fn test_list_json() {
    let fixture = TestFixture::new().with_repos(&[
        ("a", "a", "u1", false),
        ("b", "b", "u2", false),
    ]);

    let output = fixture
        .command()
        .arg("--json")
        .arg("list")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let messages = parsed["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].as_str().unwrap().starts_with("a: u1"));
    assert!(messages[1].as_str().unwrap().starts_with("b: u2"));
}

#[test]
fn test_list_malformed_config() {
    let fixture = TestFixture::new();
    std::fs::write(fixture.config_path(), "rootFolder: [unclosed").unwrap();

    fixture
        .command()
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// An address nothing listens on, so runs stay hermetic. Auth confirmation
/// failure is non-fatal by design, and a dorks file of comments issues no
/// search calls at all.
const DEAD_BASE_URL: &str = "http://127.0.0.1:9";

fn ghdork_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ghdork"));
    cmd.env_remove("GH_TOKEN")
        .env_remove("GH_USER")
        .env_remove("GH_PASS")
        .env_remove("GH_URL");
    cmd.arg("--base-url").arg(DEAD_BASE_URL).arg("--no-color");
    cmd
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn missing_dorks_file_is_fatal() {
    let temp = tempdir().unwrap();

    ghdork_cmd()
        .arg("-d")
        .arg(temp.path().join("nope.txt"))
        .arg("-u")
        .arg("molly")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dorks file does not exist"));
}

#[test]
fn comments_only_dorks_issue_no_searches() {
    let temp = tempdir().unwrap();
    let dorks = temp.path().join("dorks.txt");
    write_file(&dorks, "# comment\n; another\n\n");

    ghdork_cmd()
        .arg("-d")
        .arg(&dorks)
        .arg("-u")
        .arg("molly")
        .assert()
        .success()
        .stderr(predicate::str::contains("Searching:").not());
}

#[test]
fn unreachable_api_downgrades_to_unauthenticated() {
    let temp = tempdir().unwrap();
    let dorks = temp.path().join("dorks.txt");
    write_file(&dorks, "# comment\n");

    ghdork_cmd()
        .arg("-d")
        .arg(&dorks)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Proceeding as unauthenticated user",
        ));
}

#[test]
fn output_dir_is_created_and_cleared() {
    let temp = tempdir().unwrap();
    let dorks = temp.path().join("dorks.txt");
    write_file(&dorks, "# comment\n");
    let out_dir = temp.path().join("results");
    write_file(&out_dir.join("stale.txt"), "old run");

    ghdork_cmd()
        .arg("-d")
        .arg(&dorks)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.is_dir());
    assert!(!out_dir.join("stale.txt").exists());
}

#[test]
fn preexisting_valid_items_file_is_reset() {
    let temp = tempdir().unwrap();
    let dorks = temp.path().join("dorks.txt");
    write_file(&dorks, "# comment\n");
    let valid = temp.path().join("valid.txt");
    write_file(&valid, "stale-user\n");

    ghdork_cmd()
        .arg("-d")
        .arg(&dorks)
        .arg("--users-file")
        .arg(temp.path().join("users.txt"))
        .arg("--valid-items-file")
        .arg(&valid)
        .assert()
        .success();

    assert!(!valid.exists());
}

#[test]
fn scope_options_conflict() {
    let temp = tempdir().unwrap();
    let dorks = temp.path().join("dorks.txt");
    write_file(&dorks, "# comment\n");

    ghdork_cmd()
        .arg("-d")
        .arg(&dorks)
        .arg("-u")
        .arg("molly")
        .arg("--org")
        .arg("acme")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

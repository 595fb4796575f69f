//! End-to-end tests: document on disk -> `darkblue` -> answer key on disk.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn darkblue() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("darkblue").unwrap()
}

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../samples")
        .join(name)
}

fn answer_key(document: &Path, output: &Path) -> assert_cmd::assert::Assert {
    darkblue()
        .arg("answer-key")
        .arg("--document")
        .arg(document)
        .arg("--output")
        .arg(output)
        .arg("--format")
        .arg("text")
        .assert()
}

#[test]
fn e2e_linux_sample() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("answerkey.txt");

    answer_key(&sample("linux-image.json"), &output).success();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Score: 45/60\n\
         [+5] Question Forensics 1 was answered correctly. Answer: 4444\n\
         [+5] File /home/bob/hack.sh was deleted.\n\
         [+10] User bob has been removed.\n\
         [+5] User alice is now in the sudo group.\n\
         [+5] Process nc was stopped.\n\
         [+5] Package john was uninstalled.\n\
         [+5] Package ufw was installed.\n\
         [+5] Config File /etc/ssh/sshd_config was set to positive value PermitRootLogin no.\n"
    );
}

#[test]
fn e2e_windows_sample() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("answerkey.txt");

    answer_key(&sample("windows-image.json"), &output).success();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Score: 38/50\n\
         [+8] User guest has been removed.\n\
         [+6] User Jim is not an administrator.\n\
         [+8] Service Telnet was stopped.\n\
         [+6] Program Wireshark was uninstalled.\n\
         [+4] public firewall profile enabled.\n\
         [+6] Blank passwords are restricted.\n"
    );
}

#[test]
fn e2e_regeneration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("answerkey.txt");

    answer_key(&sample("windows-image.json"), &output).success();
    let first = std::fs::read_to_string(&output).unwrap();
    answer_key(&sample("windows-image.json"), &output).success();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), first);
}

#[test]
fn e2e_rejected_document_keeps_previous_key() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("answerkey.txt");
    std::fs::write(&output, "previous key\n").unwrap();

    let document = dir.path().join("foreign.json");
    std::fs::write(
        &document,
        r#"{"format": "SomethingElse", "OS": "Linux", "files": [{"filepath": "/tmp/x", "exist": false, "positive_points": 3}]}"#,
    )
    .unwrap();

    answer_key(&document, &output)
        .failure()
        .stderr(predicate::str::contains("not a DarkBlue configuration document"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous key\n");

    std::fs::write(&document, r#"{"format": "DarkBlue", "OS": "MacOS"}"#).unwrap();
    answer_key(&document, &output)
        .failure()
        .stderr(predicate::str::contains("unsupported operating system"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous key\n");
}

#[test]
fn e2e_missing_categories_are_skipped() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("sparse.json");
    std::fs::write(
        &document,
        r#"{
            "format": "DarkBlue",
            "OS": "Linux",
            "score": 10,
            "users": "not a list",
            "challenge_questions": [{"name": "Q1", "answer": "42", "points": 2}]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("answerkey.txt");

    answer_key(&document, &output).success();
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Score: 2/10\n[+2] Question Q1 was answered correctly. Answer: 42\n"
    );
}

#[test]
fn e2e_init_edit_readme_answer_key() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("image.json");

    darkblue()
        .arg("init")
        .arg("--os")
        .arg("linux")
        .arg("--score")
        .arg("20")
        .arg("--output")
        .arg(&document)
        .assert()
        .success();

    let set = |name: &str, value: &str| {
        darkblue()
            .arg("attr")
            .arg("set")
            .arg("--document")
            .arg(&document)
            .arg(name)
            .arg(value)
            .assert()
            .success();
    };
    set("readme", r#""Harden this box.""#);
    set(
        "users",
        r#"[{"name": "bob", "allowed": false, "positive_points": 10},
            {"name": "alice", "allowed": true, "is_sudo": true, "sudo_initial_state": true, "positive_points": 1}]"#,
    );
    set(
        "processes",
        r#"[{"name": "apache2", "default_state": true, "desired_state": true, "positive_points": 1}]"#,
    );

    darkblue()
        .arg("readme")
        .arg("--document")
        .arg(&document)
        .arg("--write")
        .assert()
        .success();

    darkblue()
        .arg("attr")
        .arg("get")
        .arg("--document")
        .arg(&document)
        .arg("readme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Harden this box."))
        .stdout(predicate::str::contains("Allowed users:"))
        .stdout(predicate::str::contains("Critical processes:"))
        .stdout(predicate::str::contains("apache2"));

    let output = dir.path().join("answerkey.txt");
    answer_key(&document, &output).success();
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Score: 10/20\n[+10] User bob has been removed.\n"
    );
}

#[test]
fn e2e_readme_write_keeps_cleared_editor_fields() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("image.json");
    std::fs::write(
        &document,
        r#"{
            "format": "DarkBlue", "OS": "Linux", "score": 20, "readme": "Hi.",
            "users": [
                {"name": "bob", "allowed": false, "positive_points": 10, "negative_points": 0},
                {"name": "eve", "allowed": false, "positive_points": 5, "negative_points": null}
            ],
            "packages": "not a list"
        }"#,
    )
    .unwrap();

    darkblue()
        .arg("readme")
        .arg("--document")
        .arg(&document)
        .arg("--write")
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&document).unwrap()).unwrap();
    assert_eq!(saved["users"].as_array().unwrap().len(), 2);
    assert_eq!(saved["packages"], "not a list");

    let output = dir.path().join("answerkey.txt");
    answer_key(&document, &output).success();
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Score: 15/20\n[+10] User bob has been removed.\n[+5] User eve has been removed.\n"
    );
}

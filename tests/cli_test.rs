//! End-to-end checks of the `cravt` binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cravt(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cravt").unwrap();
    cmd.env_remove("CRAVT_BACKEND_URL")
        .env_remove("CRAVT_STORAGE_PATH")
        .env_remove("CRAVT_STORAGE_KEY")
        .arg("--config")
        .arg(tmp.path().join("missing.yaml"))
        .arg("--storage-path")
        .arg(tmp.path().join("chats.sled"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("cravt")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_list_on_fresh_storage_shows_one_new_chat() {
    let tmp = TempDir::new().unwrap();
    cravt(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("New chat"));
}

#[test]
fn test_invalid_backend_url_is_rejected() {
    let tmp = TempDir::new().unwrap();
    cravt(&tmp)
        .args(["--backend-url", "not-a-url", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid backend url"));
}

#[test]
fn test_config_file_is_honored() {
    let (dir, config_path) = common::temp_config_file(
        r#"
backend:
  url: "mailto:someone@example.com"
"#,
    );
    Command::cargo_bin("cravt")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("--storage-path")
        .arg(dir.path().join("chats.sled"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_then_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hello!"})))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let url = format!("{}/chat", server.uri());

    cravt(&tmp)
        .args(["--backend-url", url.as_str(), "send", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello!"));

    cravt(&tmp)
        .args(["export", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You: hi\n\nAI: hello!"));
}

#[test]
fn test_delete_with_yes_keeps_one_chat() {
    let tmp = TempDir::new().unwrap();
    cravt(&tmp)
        .args(["delete", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted chat"));

    cravt(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("New chat"));
}

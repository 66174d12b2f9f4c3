//! Integration tests for the session lifecycle: login, whoami, logout.

mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{can_bind_localhost, seed_session, temp_taskflow_home};
use predicates::prelude::*;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_session_and_whoami_reads_it() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_taskflow_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/access-token"))
        .and(body_partial_json(
            serde_json::json!({"username": "alice", "password": "secret1A!"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "t1",
            "username": "alice",
            "id": 7,
            "email": "alice@example.com",
            "firstname": "Alice",
            "lastname": "Doe",
            "role": "Member",
            "expiresAt": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .env("TASKFLOW_API_URL", server.uri())
        .args(["login", "-u", "alice", "-p", "secret1A!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));

    assert!(home.path().join("session.json").exists());

    // A fresh process restores the session from disk; no network involved.
    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .env("TASKFLOW_API_URL", server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice  (id 7)"));
}

#[tokio::test]
async fn test_failed_login_reports_server_message_and_persists_nothing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_taskflow_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/access-token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .env("TASKFLOW_API_URL", server.uri())
        .args(["login", "-u", "alice", "-p", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_logout_erases_persisted_session() {
    let home = temp_taskflow_home();
    seed_session(&home, "t1", "alice", 7);

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!home.path().join("session.json").exists());

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("taskflow login"));
}

#[test]
fn test_corrupt_session_file_is_discarded() {
    let home = temp_taskflow_home();
    std::fs::write(home.path().join("session.json"), "{not json").unwrap();

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_register_validation_fails_before_any_network_call() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_taskflow_home();
    let server = MockServer::start().await;

    // No request may reach the server when validation fails client-side.
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .env("TASKFLOW_API_URL", server.uri())
        .args([
            "register",
            "--username",
            "alice",
            "--email",
            "alice@example.com",
            "--password",
            "secret1A!",
            "--confirm-password",
            "different1A!",
            "--firstname",
            "Alice",
            "--lastname",
            "Doe",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords don't match"));
}

#[tokio::test]
async fn test_register_happy_path() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_taskflow_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_partial_json(serde_json::json!({
            "username": "bob",
            "email": "bob@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"data": {"id": 11, "username": "bob"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taskflow")
        .env("TASKFLOW_HOME", home.path())
        .env("TASKFLOW_API_URL", server.uri())
        .args([
            "register",
            "--username",
            "bob",
            "--email",
            "bob@example.com",
            "--password",
            "secret1A!",
            "--confirm-password",
            "secret1A!",
            "--firstname",
            "Bob",
            "--lastname",
            "Doe",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered bob (id 11)"));
}

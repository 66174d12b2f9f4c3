//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;

use tempfile::TempDir;

/// Creates a temp TASKFLOW_HOME directory for test isolation.
pub fn temp_taskflow_home() -> TempDir {
    TempDir::new().expect("create temp taskflow home")
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Seeds a persisted session the way a prior `taskflow login` would have.
pub fn seed_session(home: &TempDir, token: &str, username: &str, user_id: i64) {
    let user = serde_json::json!({
        "id": user_id,
        "username": username,
        "email": format!("{username}@example.com"),
        "firstname": "",
        "lastname": "",
        "role": "Member"
    });
    let records = serde_json::json!({
        "jwt_token": {"value": token, "expires_at": "2030-01-01T00:00:00Z"},
        "user": {"value": user.to_string(), "expires_at": "2030-01-01T00:00:00Z"}
    });
    fs::write(
        home.path().join("session.json"),
        serde_json::to_string_pretty(&records).unwrap(),
    )
    .expect("write session file");
}

/// A minimal task payload in the API's wire shape.
pub fn task_json(id: i64, title: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": null,
        "status": status,
        "priority": "Medium",
        "dueDate": null,
        "projectId": 1,
        "assignedToUserId": null,
        "assignedToUsername": null,
        "comments": [],
        "commentCount": 0,
        "createdDate": "2026-08-01T10:00:00Z"
    })
}

/// A minimal project payload in the API's wire shape.
pub fn project_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": null,
        "ownerId": 1,
        "ownerName": "alice",
        "memberCount": 1,
        "taskCount": 0,
        "createdDate": "2026-08-01T10:00:00Z"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_session_writes_both_records() {
        let home = temp_taskflow_home();
        seed_session(&home, "t1", "alice", 7);

        let contents = fs::read_to_string(home.path().join("session.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed.get("jwt_token").is_some());
        assert!(parsed.get("user").is_some());
    }
}

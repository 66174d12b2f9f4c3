//! Durable session credential storage.
//!
//! Persists the bearer token and user profile in
//! `${TASKFLOW_HOME}/session.json` with restricted permissions (0600), keyed
//! as two records sharing one expiry. The token is never logged in full.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::session::Session;
use crate::types::UserProfile;

/// Record key for the bearer token.
const TOKEN_KEY: &str = "jwt_token";
/// Record key for the serialized user profile.
const USER_KEY: &str = "user";

/// Durable storage for the current session.
///
/// Implementations must fail closed: a record that is missing, expired, or
/// unparsable yields no session, and both records are discarded together.
pub trait SessionStore: Send + Sync {
    /// Reads the persisted session. Synchronous, no network access.
    fn load(&self) -> Option<Session>;

    /// Writes both credential records with the session's expiry.
    fn save(&self, session: &Session) -> Result<()>;

    /// Erases both records. Idempotent; never surfaces an error.
    fn clear(&self);
}

/// One persisted credential value with its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialRecord {
    value: String,
    expires_at: DateTime<Utc>,
}

/// On-disk shape: record key -> credential.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(flatten)]
    records: HashMap<String, CredentialRecord>,
}

/// File-backed session store.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by a specific file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store at the default location under the TaskFlow home.
    pub fn at_default_path() -> Self {
        Self::new(paths::session_path())
    }

    fn read_records(&self) -> Option<CredentialFile> {
        if !self.path.exists() {
            return None;
        }
        let contents = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let Some(file) = self.read_records() else {
            if self.path.exists() {
                // Unreadable or corrupt file: self-heal by erasing it.
                tracing::warn!(path = %self.path.display(), "discarding corrupt session file");
                self.clear();
            }
            return None;
        };

        let session = (|| {
            let token = file.records.get(TOKEN_KEY)?;
            let user = file.records.get(USER_KEY)?;

            let now = Utc::now();
            if token.expires_at <= now || user.expires_at <= now {
                return None;
            }

            let profile: UserProfile = serde_json::from_str(&user.value).ok()?;
            Some(Session {
                token: token.value.clone(),
                user: profile,
                expires_at: token.expires_at,
            })
        })();

        if session.is_none() {
            // Partial, expired or unparsable records leave nothing behind.
            self.clear();
        }
        session
    }

    fn save(&self, session: &Session) -> Result<()> {
        let user_json =
            serde_json::to_string(&session.user).context("Failed to serialize user profile")?;

        let mut file = CredentialFile::default();
        file.records.insert(
            USER_KEY.to_string(),
            CredentialRecord {
                value: user_json,
                expires_at: session.expires_at,
            },
        );
        file.records.insert(
            TOKEN_KEY.to_string(),
            CredentialRecord {
                value: session.token.clone(),
                expires_at: session.expires_at,
            },
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&file).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut out = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            out.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), %err, "failed to remove session file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn sample_session(expires_at: DateTime<Utc>) -> Session {
        Session {
            token: "t1".to_string(),
            user: UserProfile {
                id: 7,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                firstname: "Alice".to_string(),
                lastname: "Doe".to_string(),
                role: "Member".to_string(),
            },
            expires_at,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_save_then_load_round_trips_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = sample_session(Utc::now() + Duration::hours(8));

        store.save(&session).unwrap();
        let loaded = store.load().expect("session should survive a reload");

        assert_eq!(loaded.token, "t1");
        assert_eq!(loaded.user, session.user);
        assert_eq!(loaded.expires_at, session.expires_at);
    }

    #[test]
    fn test_load_missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_none());
    }

    #[test]
    fn test_corrupt_file_is_discarded_and_erased() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("session.json"), "{not json").unwrap();

        assert!(store.load().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_missing_token_record_discards_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let expiry = Utc::now() + Duration::hours(1);
        let only_user = serde_json::json!({
            "user": {"value": "{\"id\":1,\"username\":\"a\",\"email\":\"\",\"firstname\":\"\",\"lastname\":\"\",\"role\":\"\"}", "expires_at": expiry}
        });
        fs::write(dir.path().join("session.json"), only_user.to_string()).unwrap();

        assert!(store.load().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_unparsable_user_record_discards_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let expiry = Utc::now() + Duration::hours(1);
        let bad_user = serde_json::json!({
            "jwt_token": {"value": "t1", "expires_at": expiry},
            "user": {"value": "not a profile", "expires_at": expiry}
        });
        fs::write(dir.path().join("session.json"), bad_user.to_string()).unwrap();

        assert!(store.load().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_expired_records_are_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = sample_session(Utc::now() - Duration::minutes(1));

        store.save(&session).unwrap();

        assert!(store.load().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.clear();
        store.clear();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_has_restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save(&sample_session(Utc::now() + Duration::hours(1)))
            .unwrap();

        let mode = fs::metadata(dir.path().join("session.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

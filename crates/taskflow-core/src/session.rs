//! Session lifecycle and shared authentication state.
//!
//! [`SessionManager`] is the single owner of mutable session state. Everything
//! else reads immutable [`SessionState`] snapshots through [`SharedSession`].

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::clients::auth;
use crate::error::ApiResult;
use crate::forms::LoginForm;
use crate::gateway::ApiClient;
use crate::store::SessionStore;
use crate::types::{JwtTokenResponse, UserProfile};

/// The authenticated identity and credential held by the running client.
///
/// Token and user are only ever set together; a session is authenticated iff
/// both are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
    pub expires_at: DateTime<Utc>,
}

impl From<JwtTokenResponse> for Session {
    fn from(resp: JwtTokenResponse) -> Self {
        Session {
            token: resp.token,
            user: UserProfile {
                id: resp.id,
                username: resp.username,
                email: resp.email,
                firstname: resp.firstname,
                lastname: resp.lastname,
                role: resp.role,
            },
            expires_at: resp.expires_at,
        }
    }
}

/// Authentication state visible to consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Initial state while the store is being read. Consumers must neither
    /// render protected content nor decide the user is logged out.
    #[default]
    Loading,
    Authenticated(Session),
    Anonymous,
}

/// Cheaply clonable handle to the current session state.
///
/// Readers get snapshots; only the manager (and tests) write through it.
#[derive(Clone, Default)]
pub struct SharedSession(Arc<RwLock<SessionState>>);

impl SharedSession {
    /// Returns an immutable snapshot of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.0.read().expect("session lock poisoned").clone()
    }

    /// Returns the current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        match &*self.0.read().expect("session lock poisoned") {
            SessionState::Authenticated(session) => Some(session.token.clone()),
            SessionState::Loading | SessionState::Anonymous => None,
        }
    }

    pub(crate) fn set(&self, state: SessionState) {
        *self.0.write().expect("session lock poisoned") = state;
    }
}

/// Owns the session store and drives the state machine
/// `Loading -> Authenticated | Anonymous`.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    shared: SharedSession,
}

impl SessionManager {
    pub fn new(store: Box<dyn SessionStore>, shared: SharedSession) -> Self {
        Self { store, shared }
    }

    /// Resolves the initial state from the persisted store.
    ///
    /// Transitions out of `Loading` exactly once; calling again is a no-op.
    pub fn bootstrap(&self) {
        if self.shared.snapshot() != SessionState::Loading {
            return;
        }
        match self.store.load() {
            Some(session) => {
                tracing::debug!(user = %session.user.username, "restored persisted session");
                self.shared.set(SessionState::Authenticated(session));
            }
            None => self.shared.set(SessionState::Anonymous),
        }
    }

    /// Logs in against the remote API and makes the session current.
    ///
    /// On failure the state is left untouched and the original error
    /// propagates unchanged. On success the session is persisted, then the
    /// shared state is updated.
    pub async fn login(&self, api: &ApiClient, form: &LoginForm) -> ApiResult<Session> {
        let response = auth::login(api, form).await?;
        let session = Session::from(response);

        if let Err(err) = self.store.save(&session) {
            // The session stays live for this process; only persistence failed.
            tracing::warn!(%err, "failed to persist session");
        }
        self.shared
            .set(SessionState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Logs out locally: clears the store and resets the state. No network
    /// call; never fails.
    pub fn logout(&self) {
        self.store.clear();
        self.shared.set(SessionState::Anonymous);
    }

    /// Returns an immutable snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.shared.snapshot()
    }

    /// Returns the current session when authenticated.
    pub fn current(&self) -> Option<Session> {
        match self.state() {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Loading | SessionState::Anonymous => None,
        }
    }
}

//! Explicit session lifecycle.
//!
//! The authenticated user is never ambient global state: components that
//! need the current user receive a `Session` (or a `SessionStore` handle)
//! explicitly, and the lifecycle is tied to sign-in/sign-out.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;

/// An authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque user identifier assigned by the auth collaborator
    pub user_id: String,
    /// Email the user signed in with
    pub email: String,
    /// Bearer token for backend requests
    pub id_token: String,
    /// When this session was established
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            id_token: id_token.into(),
            issued_at: Utc::now(),
        }
    }
}

/// Holder for the current session with an explicit begin/end lifecycle.
///
/// Observers subscribe via a watch channel and see `None` when signed out.
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            current: RwLock::new(None),
            tx,
        }
    }

    /// Begin a session after a successful sign-in.
    pub fn begin(&self, session: Session) {
        tracing::info!(user_id = %session.user_id, "Session started");
        *self.current.write() = Some(session.clone());
        let _ = self.tx.send(Some(session));
    }

    /// End the current session (sign-out). No-op when already signed out.
    pub fn end(&self) {
        let mut guard = self.current.write();
        if let Some(session) = guard.take() {
            tracing::info!(user_id = %session.user_id, "Session ended");
            let _ = self.tx.send(None);
        }
    }

    /// Snapshot of the current session, if signed in.
    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Subscribe to session changes. The receiver yields the current value
    /// immediately via `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new("uid-1", "alice@example.com", "token-abc")
    }

    #[test]
    fn test_begin_and_current() {
        let store = SessionStore::new();
        assert!(!store.is_signed_in());

        store.begin(test_session());
        let current = store.current().unwrap();
        assert_eq!(current.user_id, "uid-1");
        assert_eq!(current.email, "alice@example.com");
    }

    #[test]
    fn test_end_clears_session() {
        let store = SessionStore::new();
        store.begin(test_session());
        store.end();
        assert!(store.current().is_none());

        // Ending twice is harmless
        store.end();
        assert!(!store.is_signed_in());
    }

    #[tokio::test]
    async fn test_subscribers_observe_lifecycle() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.begin(test_session());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().user_id, "uid-1");

        store.end();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}

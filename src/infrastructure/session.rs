//! Staff session store
//!
//! Single owner of the bearer token and signed-in profile. The app
//! shell sets it on login and clears it on logout; the HTTP gateway
//! clears it when the backend answers 401. State changes are broadcast
//! on a watch channel so the shell can route to the sign-in screen.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

const KEY_TOKEN: &str = "auth.token";
const KEY_PROFILE: &str = "auth.profile";

/// Signed-in staff identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub name: String,
    pub role: String,
}

/// Session lifecycle, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    Active,
    /// Cleared by a 401; the shell must route to sign-in
    Expired,
}

pub struct SessionStore {
    keys: DashMap<String, String>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SessionState::SignedOut);
        Self {
            keys: DashMap::new(),
            state_tx,
        }
    }

    /// Store the token and profile after a successful login.
    pub fn sign_in(&self, token: impl Into<String>, profile: StaffProfile) {
        self.keys.insert(KEY_TOKEN.to_string(), token.into());
        if let Ok(raw) = serde_json::to_string(&profile) {
            self.keys.insert(KEY_PROFILE.to_string(), raw);
        }
        info!(staff = %profile.name, role = %profile.role, "Session started");
        let _ = self.state_tx.send(SessionState::Active);
    }

    pub fn token(&self) -> Option<String> {
        self.keys.get(KEY_TOKEN).map(|entry| entry.value().clone())
    }

    pub fn profile(&self) -> Option<StaffProfile> {
        self.keys
            .get(KEY_PROFILE)
            .and_then(|entry| serde_json::from_str(entry.value()).ok())
    }

    pub fn is_authenticated(&self) -> bool {
        self.keys.contains_key(KEY_TOKEN)
    }

    /// Explicit logout.
    pub fn sign_out(&self) {
        self.clear_keys();
        info!("Session ended");
        let _ = self.state_tx.send(SessionState::SignedOut);
    }

    /// Invoked by the gateway on 401: every session key is dropped and
    /// the expiry is broadcast. Never retries the failed call.
    pub(crate) fn expire(&self) {
        self.clear_keys();
        let _ = self.state_tx.send(SessionState::Expired);
    }

    fn clear_keys(&self) {
        self.keys.clear();
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::domain::ports::SessionContext for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn staff_name(&self) -> Option<String> {
        self.profile().map(|p| p.name)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> StaffProfile {
        StaffProfile {
            name: "Linh".into(),
            role: "staff".into(),
        }
    }

    #[test]
    fn sign_in_stores_token_and_profile() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        store.sign_in("tok-123", sample_profile());
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.profile(), Some(sample_profile()));
    }

    #[test]
    fn sign_out_clears_every_key() {
        let store = SessionStore::new();
        store.sign_in("tok-123", sample_profile());
        store.sign_out();
        assert!(store.token().is_none());
        assert!(store.profile().is_none());
        assert_eq!(*store.subscribe().borrow(), SessionState::SignedOut);
    }

    #[test]
    fn expire_broadcasts_and_clears() {
        let store = SessionStore::new();
        store.sign_in("tok-123", sample_profile());
        let rx = store.subscribe();
        store.expire();
        assert!(!store.is_authenticated());
        assert_eq!(*rx.borrow(), SessionState::Expired);
    }
}

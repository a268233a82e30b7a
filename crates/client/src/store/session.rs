//! Authenticated session state.
//!
//! A deliberately small persisted subset: only the two tokens survive a
//! restart (under the `auth` partition); user and profile are re-fetched per
//! process so a stale identity can never be rendered from disk.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};

use superlian_core::{User, UserProfile};

use super::persist::StoragePort;

/// Persisted key for the access token.
const ACCESS_KEY: &str = "auth.access";
/// Persisted key for the refresh token.
const REFRESH_KEY: &str = "auth.refresh";

#[derive(Default)]
struct SessionState {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
    user: Option<User>,
    profile: Option<UserProfile>,
}

/// Holds tokens, the authenticated user, and the user's profile.
///
/// Invariants:
/// - `user` and `profile` are only ever non-null while `access` is non-null.
/// - No code path clears one token while leaving the other set; [`reset`] is
///   the only way a session ends.
///
/// [`reset`]: SessionStore::reset
pub struct SessionStore {
    storage: Arc<dyn StoragePort>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create a store, rehydrating persisted tokens if present.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        let state = SessionState {
            access: storage.load(ACCESS_KEY).map(SecretString::from),
            refresh: storage.load(REFRESH_KEY).map(SecretString::from),
            user: None,
            profile: None,
        };
        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    /// Store both tokens, persisting each one only when it is non-null.
    ///
    /// A `None` token is not written to storage (nothing ever persists a
    /// "null" literal), and it does not remove a previously persisted value;
    /// removal is [`SessionStore::reset`]'s job.
    pub fn set_tokens(&self, access: Option<String>, refresh: Option<String>) {
        let mut state = self.write();
        if let Some(token) = &access {
            self.storage.save(ACCESS_KEY, token);
        }
        if let Some(token) = &refresh {
            self.storage.save(REFRESH_KEY, token);
        }
        state.access = access.map(SecretString::from);
        state.refresh = refresh.map(SecretString::from);
    }

    /// Replace the authenticated user (no merge).
    pub fn set_user(&self, user: User) {
        self.write().user = Some(user);
    }

    /// Replace the user's profile (no merge).
    pub fn set_profile(&self, profile: UserProfile) {
        self.write().profile = Some(profile);
    }

    /// End the session: clear tokens, user, and profile together and remove
    /// the persisted token keys.
    pub fn reset(&self) {
        let mut state = self.write();
        state.access = None;
        state.refresh = None;
        state.user = None;
        state.profile = None;
        self.storage.remove(ACCESS_KEY);
        self.storage.remove(REFRESH_KEY);
    }

    /// The current access token, if a session is active.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .access
            .as_ref()
            .map(|token| token.expose_secret().to_owned())
    }

    /// The current refresh token, if a session is active.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read()
            .refresh
            .as_ref()
            .map(|token| token.expose_secret().to_owned())
    }

    /// The authenticated user, if known.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// The authenticated user's profile, if fetched.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.read().profile.clone()
    }

    /// Whether an access token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().access.is_some()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

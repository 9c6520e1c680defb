//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The navigation guard reads this store on every transition, the HTTP client
//! reads the token for outgoing requests and clears the session on a 401, and
//! the login page installs a fresh session after a credential exchange.
//!
//! PERSISTENCE
//! ===========
//! Token and profile are written as one JSON record under [`SESSION_KEY`], so a
//! crash between writes can never leave a token without a profile. Records
//! written by older releases under the split `token` / `profile` keys are
//! migrated on first hydration when both halves are present.
//!
//! Storage is best-effort: failed writes are logged and the in-memory session
//! stays authoritative for the lifetime of the page.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use super::profile::{Profile, Role};
use crate::util::storage::{BrowserStorage, MemoryStorage, SessionStorage, StorageError};

/// Storage key of the combined session record.
pub const SESSION_KEY: &str = "till.session";
/// Token key of the split layout written by earlier releases.
pub const LEGACY_TOKEN_KEY: &str = "token";
/// Profile key of the split layout written by earlier releases.
pub const LEGACY_PROFILE_KEY: &str = "profile";

/// An authenticated identity: bearer token plus profile, always together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub profile: Profile,
}

impl Session {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.profile.has_role(role)
    }

    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.profile.primary_role()
    }
}

fn decode_session(raw: &str) -> Result<Session, StorageError> {
    let session: Session = serde_json::from_str(raw)?;
    if session.token.is_empty() {
        return Err(serde_json::Error::custom("empty token").into());
    }
    Ok(session)
}

/// Session state backed by a [`SessionStorage`].
///
/// Either both token and profile are present or neither is.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    current: Option<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create an anonymous store. Call [`Self::hydrate_from_storage`] to pick
    /// up a persisted session.
    pub fn new(storage: S) -> Self {
        Self { storage, current: None }
    }

    /// Replace the session and persist it as a single record.
    ///
    /// An empty token cannot authenticate anything, so it clears the session
    /// instead.
    pub fn set_session(&mut self, token: impl Into<String>, profile: Profile) {
        let token = token.into();
        if token.is_empty() {
            warn!("session: refusing empty token, clearing session");
            self.logout();
            return;
        }
        let session = Session { token, profile };
        self.persist(&session);
        info!("session: signed in user {} as {:?}", session.profile.id, session.profile.roles());
        self.current = Some(session);
    }

    /// Replace the profile of the current session, e.g. after re-fetching it.
    ///
    /// Returns `false` and changes nothing when no one is signed in.
    pub fn set_profile(&mut self, profile: Profile) -> bool {
        let Some(mut session) = self.current.take() else {
            debug!("session: profile refresh ignored while anonymous");
            return false;
        };
        session.profile = profile;
        self.persist(&session);
        self.current = Some(session);
        true
    }

    /// Install a persisted session if memory holds none.
    ///
    /// Missing, partial, or corrupt storage leaves the store anonymous. Safe to
    /// call repeatedly. Returns whether the store is authenticated afterwards.
    pub fn hydrate_from_storage(&mut self) -> bool {
        if self.current.is_some() {
            return true;
        }
        if let Some(session) = self.read_record() {
            debug!("session: restored user {} from storage", session.profile.id);
            self.current = Some(session);
        }
        self.current.is_some()
    }

    /// Clear memory and storage. Calling it while anonymous is a no-op.
    pub fn logout(&mut self) {
        let had_session = self.current.take().is_some();
        self.remove_keys(&[SESSION_KEY, LEGACY_TOKEN_KEY, LEGACY_PROFILE_KEY]);
        if had_session {
            info!("session: signed out");
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.current.as_ref().is_some_and(|s| s.has_role(role))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.has_role(Role::Employee)
    }

    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.current.as_ref().and_then(Session::primary_role)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.current.as_ref().map(|s| &s.profile)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Owned copy of the current state, for callers that must not hold a borrow.
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.current.clone()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self, session: &Session) -> bool {
        let result = serde_json::to_string(session)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(SESSION_KEY, &raw));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("session: persisting session failed, keeping it in memory only: {e}");
                false
            }
        }
    }

    fn read_record(&self) -> Option<Session> {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => match decode_session(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("session: discarding stored record: {e}");
                    self.remove_keys(&[SESSION_KEY]);
                    None
                }
            },
            Ok(None) => self.migrate_legacy(),
            Err(e) => {
                warn!("session: storage read failed: {e}");
                None
            }
        }
    }

    /// Best-effort removal; returns how many keys are confirmed gone.
    fn remove_keys(&self, keys: &[&str]) -> usize {
        keys.iter()
            .filter(|key| match self.storage.remove(key) {
                Ok(()) => true,
                Err(e) => {
                    debug!("session: could not remove {key}: {e}");
                    false
                }
            })
            .count()
    }

    /// Adopt a complete split-key record and rewrite it in the combined layout.
    fn migrate_legacy(&self) -> Option<Session> {
        let token = self.storage.get(LEGACY_TOKEN_KEY).ok().flatten()?;
        let raw_profile = self.storage.get(LEGACY_PROFILE_KEY).ok().flatten()?;
        if token.is_empty() {
            return None;
        }
        let profile = match serde_json::from_str::<Profile>(&raw_profile) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("session: ignoring legacy profile record: {e}");
                return None;
            }
        };
        let session = Session { token, profile };
        if self.persist(&session) {
            self.remove_keys(&[LEGACY_TOKEN_KEY, LEGACY_PROFILE_KEY]);
            info!("session: migrated legacy record for user {}", session.profile.id);
        }
        Some(session)
    }
}

/// Cloneable handle to the one session store of an application.
///
/// The guard, the HTTP client and the UI all hold clones of the same handle.
/// The lock only exists to satisfy context bounds; every access is short and
/// happens on the UI thread.
pub struct SharedSession<S> {
    inner: Arc<RwLock<SessionStore<S>>>,
}

impl<S> Clone for SharedSession<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: SessionStorage> SharedSession<S> {
    pub fn new(storage: S) -> Self {
        Self { inner: Arc::new(RwLock::new(SessionStore::new(storage))) }
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionStore<S>) -> R) -> R {
        let store = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*store)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut SessionStore<S>) -> R) -> R {
        let mut store = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *store)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.read(SessionStore::snapshot)
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token().map(str::to_owned))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(SessionStore::is_authenticated)
    }

    pub fn set_session(&self, token: impl Into<String>, profile: Profile) {
        self.write(|s| s.set_session(token, profile));
    }

    pub fn set_profile(&self, profile: Profile) -> bool {
        self.write(|s| s.set_profile(profile))
    }

    pub fn hydrate_from_storage(&self) -> bool {
        self.write(SessionStore::hydrate_from_storage)
    }

    pub fn logout(&self) {
        self.write(SessionStore::logout);
    }

    /// Sign out and drop this handle. Used to reset state between tests.
    pub fn teardown(self) {
        self.logout();
    }
}

impl SharedSession<BrowserStorage> {
    /// Session backed by `localStorage`.
    #[must_use]
    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }
}

impl SharedSession<MemoryStorage> {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

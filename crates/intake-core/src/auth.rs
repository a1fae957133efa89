//! Authentication seam.
//!
//! The dashboard only talks to [`AuthService`]; tests swap in their own
//! implementation. [`GuestAuth`] is the built-in provider: a single guest
//! account persisted in the key-value store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

pub const AUTH_USER_KEY: &str = "mockAuthUser";
pub const DEFAULT_GUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl AuthUser {
    pub fn guest() -> Self {
        Self {
            uid: "guest".into(),
            email: "guest@example.com".into(),
            display_name: "Guest User".into(),
            is_anonymous: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in failed: {0}")]
    SignInFailed(String),
    #[error("Session storage error: {0}")]
    Session(String),
}

pub type AuthListener = Box<dyn Fn(Option<&AuthUser>) + Send + Sync>;

pub trait AuthService: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;

    /// Registers `listener` and calls it right away with the current user.
    /// The listener stays registered until the returned handle is dropped.
    fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription;

    fn sign_out(&self) -> Result<(), AuthError>;

    fn sign_in_as_guest(&self) -> Result<AuthUser, AuthError>;
}

/// Listener table shared by auth implementations.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Arc<AuthListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe(self: &Arc<Self>, listener: AuthListener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(id, Arc::new(listener));
        }
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener. The table lock is released before any call so a
    /// listener may subscribe or unsubscribe.
    pub fn notify(&self, user: Option<&AuthUser>) {
        let snapshot: Vec<Arc<AuthListener>> = match self.listeners.lock() {
            Ok(listeners) => listeners.values().cloned().collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener(user);
        }
    }

    fn remove(&self, id: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.remove(&id);
        }
    }
}

/// Handle for a registered auth listener. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Guest-only provider. The signed-in user is kept under [`AUTH_USER_KEY`] so
/// a restart resumes the session.
pub struct GuestAuth {
    store: Arc<dyn KeyValueStore>,
    user: RwLock<Option<AuthUser>>,
    registry: Arc<ListenerRegistry>,
    login_delay: Duration,
}

impl GuestAuth {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_delay(store, DEFAULT_GUEST_DELAY)
    }

    pub fn with_delay(store: Arc<dyn KeyValueStore>, login_delay: Duration) -> Self {
        let user = match store.get(AUTH_USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(%err, "ignoring unreadable saved session");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(%err, "could not read saved session");
                None
            }
        };
        if let Some(user) = &user {
            debug!(uid = %user.uid, "resumed saved session");
        }
        Self {
            store,
            user: RwLock::new(user),
            registry: ListenerRegistry::new(),
            login_delay,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    fn set_user(&self, user: Option<AuthUser>) -> Result<(), AuthError> {
        {
            let mut slot = self
                .user
                .write()
                .map_err(|_| AuthError::Session("session lock poisoned".into()))?;
            *slot = user.clone();
        }
        self.registry.notify(user.as_ref());
        Ok(())
    }
}

impl AuthService for GuestAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.read().ok().and_then(|user| user.clone())
    }

    fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription {
        let current = self.current_user();
        listener(current.as_ref());
        self.registry.subscribe(listener)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.store
            .remove(AUTH_USER_KEY)
            .map_err(|err| AuthError::Session(err.to_string()))?;
        self.set_user(None)?;
        info!("signed out");
        Ok(())
    }

    fn sign_in_as_guest(&self) -> Result<AuthUser, AuthError> {
        if !self.login_delay.is_zero() {
            std::thread::sleep(self.login_delay);
        }
        let user = AuthUser::guest();
        let encoded =
            serde_json::to_string(&user).map_err(|err| AuthError::SignInFailed(err.to_string()))?;
        self.store
            .set(AUTH_USER_KEY, &encoded)
            .map_err(|err| AuthError::SignInFailed(err.to_string()))?;
        self.set_user(Some(user.clone()))?;
        info!(uid = %user.uid, "signed in as guest");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::AtomicUsize;

    fn guest_auth(store: &MemoryStore) -> GuestAuth {
        GuestAuth::with_delay(Arc::new(store.clone()), Duration::ZERO)
    }

    #[test]
    fn listener_fires_immediately_and_on_change() {
        let store = MemoryStore::new();
        let auth = guest_auth(&store);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = auth.on_auth_state_changed(Box::new(move |_: Option<&AuthUser>| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        auth.sign_in_as_guest().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(subscription);
        assert_eq!(auth.listener_count(), 0);
        auth.sign_out().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn session_survives_restart_until_sign_out() {
        let store = MemoryStore::new();
        guest_auth(&store).sign_in_as_guest().unwrap();

        let resumed = guest_auth(&store);
        assert_eq!(resumed.current_user(), Some(AuthUser::guest()));

        resumed.sign_out().unwrap();
        assert_eq!(guest_auth(&store).current_user(), None);
    }

    #[test]
    fn unreadable_session_starts_signed_out() {
        let store = MemoryStore::new();
        store.set(AUTH_USER_KEY, "{").unwrap();
        assert_eq!(guest_auth(&store).current_user(), None);
    }
}

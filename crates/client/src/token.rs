//! The bearer token slot.
//!
//! Historically the frontend kept the token in two places: inside the
//! persisted store state and in a second bare storage slot read directly by
//! the API layer's request interceptor. Missing the second write was the
//! main source of "logged in but unauthenticated" bugs. [`TokenSlot`] is
//! the single accessor that owns both: every set/clear goes through it, and
//! the durable slot is written before the in-memory value becomes visible.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::storage::StorageAdapter;

/// Storage key for the bare token slot consumed by the API client.
pub const TOKEN_SLOT_KEY: &str = "token";

/// Shared accessor for the session's bearer token.
///
/// Cloning is cheap; all clones share the same slot. The store writes it on
/// login/logout/rehydration, the API client reads it per request and clears
/// it on a 401 from a protected endpoint.
#[derive(Clone)]
pub struct TokenSlot {
    inner: Arc<TokenSlotInner>,
}

struct TokenSlotInner {
    value: RwLock<Option<SecretString>>,
    storage: Arc<dyn StorageAdapter>,
}

impl TokenSlot {
    /// Create a token slot backed by `storage`, seeding the in-memory value
    /// from any token already persisted in the durable slot.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        let value = storage.get(TOKEN_SLOT_KEY).map(SecretString::from);
        if value.is_some() {
            tracing::debug!("Seeded token slot from durable storage");
        }
        Self {
            inner: Arc::new(TokenSlotInner {
                value: RwLock::new(value),
                storage,
            }),
        }
    }

    /// The current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        self.inner.value.read().clone()
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.inner.value.read().is_some()
    }

    /// Store a new token.
    ///
    /// The durable slot is written before this method returns, so a caller
    /// that issues an API request immediately afterwards always sees the
    /// token (the login ordering invariant).
    pub fn set(&self, token: SecretString) {
        let mut value = self.inner.value.write();
        self.inner.storage.set(TOKEN_SLOT_KEY, token.expose_secret());
        *value = Some(token);
    }

    /// Clear the token from memory and from the durable slot.
    pub fn clear(&self) {
        let mut value = self.inner.value.write();
        self.inner.storage.remove(TOKEN_SLOT_KEY);
        *value = None;
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSlot")
            .field(
                "value",
                &if self.is_present() {
                    "[REDACTED]"
                } else {
                    "(none)"
                },
            )
            .finish_non_exhaustive()
    }
}

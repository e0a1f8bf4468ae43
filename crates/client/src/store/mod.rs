//! The application store.
//!
//! Single source of truth for session, catalog, and cart state, and the
//! only component allowed to mutate them. State transitions are a closed
//! set of [`Action`] variants applied by an exhaustive-match reducer; every
//! transition persists the `{user, token, cart}` subset and then notifies
//! subscribers with a snapshot of the new state.
//!
//! # Construction
//!
//! There is no global singleton. The composition root builds the store
//! explicitly and hands out clones:
//!
//! ```rust
//! use std::sync::Arc;
//! use sweet_shop_client::storage::MemoryStorage;
//! use sweet_shop_client::store::Store;
//! use sweet_shop_client::token::TokenSlot;
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let token_slot = TokenSlot::new(storage.clone());
//! let store = Store::new(storage, token_slot);
//! assert!(store.state().cart.is_empty());
//! ```
//!
//! # Ordering invariant
//!
//! `login` writes the bearer token through the [`TokenSlot`] before the
//! action completes, so an API call issued on the very next line is always
//! authenticated. See [`TokenSlot::set`].
//!
//! # Re-entrancy
//!
//! A dispatch issued from inside a subscriber callback does not mutate
//! state mid-notification; it is queued and applied after the current pass
//! finishes.

pub mod cart;
pub mod persist;

pub use cart::{Cart, CartChange, CartLine};
pub use persist::{PersistedState, STORAGE_KEY};

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};

use sweet_shop_core::{CurrentUser, Sweet, SweetId, SweetPatch};

use crate::storage::StorageAdapter;
use crate::token::TokenSlot;

// =============================================================================
// State
// =============================================================================

/// The full in-memory application state.
///
/// Snapshots of this are what subscribers and [`Store::state`] hand out.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The signed-in user; `None` when signed out.
    pub user: Option<CurrentUser>,
    /// The product catalog, replaced wholesale on fetch.
    pub catalog: Vec<Sweet>,
    /// Pending purchase selections.
    pub cart: Cart,
    /// Whether a fetch cycle is in flight. Transient, never persisted.
    pub is_loading: bool,
    /// Last surfaced error message. Transient, never persisted.
    pub error: Option<String>,
}

impl AppState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Look up a catalog entry by id.
    #[must_use]
    pub fn sweet(&self, id: &SweetId) -> Option<&Sweet> {
        self.catalog.iter().find(|s| &s.id == id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// The closed set of state transitions.
///
/// Every mutation of [`AppState`] goes through one of these variants; the
/// reducer matches exhaustively so adding a variant is a compile error
/// until it is handled.
#[derive(Clone)]
pub enum Action {
    /// Establish a session. The token is written to the durable slot
    /// before the action completes.
    Login {
        /// The authenticated user.
        user: CurrentUser,
        /// The bearer token for the session.
        token: SecretString,
    },
    /// Clear the session and the stored token.
    Logout,
    /// Replace the catalog wholesale. Never touches the cart, even if
    /// referenced sweets vanish.
    SetCatalog(Vec<Sweet>),
    /// Append a sweet to the catalog.
    AddSweet(Sweet),
    /// Merge fields into the matching catalog entry; no-op if absent.
    UpdateSweet {
        /// Which entry to patch.
        id: SweetId,
        /// The fields to change.
        patch: SweetPatch,
    },
    /// Remove a sweet from the catalog by id.
    RemoveSweet(SweetId),
    /// Add units of a sweet to the cart (merging by id).
    AddToCart {
        /// Snapshot source for the line.
        sweet: Sweet,
        /// Units to add.
        quantity: u32,
    },
    /// Set a cart line's exact quantity; zero removes the line.
    SetCartQuantity {
        /// Which line.
        id: SweetId,
        /// The new quantity.
        quantity: u32,
    },
    /// Remove a cart line by id.
    RemoveFromCart(SweetId),
    /// Empty the cart.
    ClearCart,
    /// Overwrite the loading flag.
    SetLoading(bool),
    /// Overwrite the error message (last write wins).
    SetError(Option<String>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { user, .. } => f
                .debug_struct("Login")
                .field("user", user)
                .field("token", &"[REDACTED]")
                .finish(),
            Self::Logout => write!(f, "Logout"),
            Self::SetCatalog(sweets) => write!(f, "SetCatalog({} sweets)", sweets.len()),
            Self::AddSweet(sweet) => f.debug_tuple("AddSweet").field(&sweet.id).finish(),
            Self::UpdateSweet { id, patch } => f
                .debug_struct("UpdateSweet")
                .field("id", id)
                .field("patch", patch)
                .finish(),
            Self::RemoveSweet(id) => f.debug_tuple("RemoveSweet").field(id).finish(),
            Self::AddToCart { sweet, quantity } => f
                .debug_struct("AddToCart")
                .field("id", &sweet.id)
                .field("quantity", quantity)
                .finish(),
            Self::SetCartQuantity { id, quantity } => f
                .debug_struct("SetCartQuantity")
                .field("id", id)
                .field("quantity", quantity)
                .finish(),
            Self::RemoveFromCart(id) => f.debug_tuple("RemoveFromCart").field(id).finish(),
            Self::ClearCart => write!(f, "ClearCart"),
            Self::SetLoading(v) => f.debug_tuple("SetLoading").field(v).finish(),
            Self::SetError(v) => f.debug_tuple("SetError").field(v).finish(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

type Subscriber = Arc<dyn Fn(&AppState) + Send + Sync>;

/// The application store.
///
/// Cloning is cheap; all clones share the same state, storage, and
/// subscriber list.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<Shared>,
    storage: Arc<dyn StorageAdapter>,
    token_slot: TokenSlot,
}

struct Shared {
    app: AppState,
    subscribers: Vec<Subscriber>,
    pending: VecDeque<Action>,
    notifying: bool,
}

impl Store {
    /// Construct a store, rehydrating the persisted subset from `storage`.
    ///
    /// Malformed or missing persisted state seeds the default empty state;
    /// construction never fails. A rehydrated token is re-written to the
    /// bare token slot the API client reads, so API calls made right after
    /// startup are authenticated (the de-duplication bridge).
    #[must_use]
    pub fn new(storage: Arc<dyn StorageAdapter>, token_slot: TokenSlot) -> Self {
        let persisted = persist::load(storage.as_ref());

        if let Some(token) = &persisted.token {
            token_slot.set(SecretString::from(token.clone()));
        }

        let app = AppState {
            user: persisted.user,
            cart: persisted.cart,
            ..AppState::default()
        };

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(Shared {
                    app,
                    subscribers: Vec::new(),
                    pending: VecDeque::new(),
                    notifying: false,
                }),
                storage,
                token_slot,
            }),
        }
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner.state.lock().app.clone()
    }

    /// Register a callback invoked with a snapshot after every transition.
    pub fn subscribe(&self, subscriber: impl Fn(&AppState) + Send + Sync + 'static) {
        self.inner.state.lock().subscribers.push(Arc::new(subscriber));
    }

    /// The token slot shared with the API client.
    #[must_use]
    pub fn token_slot(&self) -> &TokenSlot {
        &self.inner.token_slot
    }

    /// Apply an action: reduce, persist the durable subset, notify.
    ///
    /// If called from inside a subscriber callback the action is queued and
    /// applied once the current notification pass completes.
    pub fn dispatch(&self, action: Action) {
        let mut shared = self.inner.state.lock();
        shared.pending.push_back(action);
        if shared.notifying {
            // Re-entrant dispatch from a subscriber; the outer pass will
            // drain the queue.
            return;
        }

        shared.notifying = true;
        while let Some(action) = shared.pending.pop_front() {
            self.apply(&mut shared.app, action);

            let durable = PersistedState {
                user: shared.app.user.clone(),
                token: self
                    .inner
                    .token_slot
                    .get()
                    .map(|t| t.expose_secret().to_owned()),
                cart: shared.app.cart.clone(),
            };
            persist::save(self.inner.storage.as_ref(), &durable);

            let snapshot = shared.app.clone();
            let subscribers = shared.subscribers.clone();
            // Release the lock while callbacks run; re-entrant dispatches
            // land in `pending` and are picked up by this loop.
            drop(shared);
            for subscriber in &subscribers {
                subscriber(&snapshot);
            }
            shared = self.inner.state.lock();
        }
        shared.notifying = false;
    }

    /// The exhaustive reducer. Token slot writes happen here, inside the
    /// action, so they are ordered before the dispatch returns.
    fn apply(&self, app: &mut AppState, action: Action) {
        match action {
            Action::Login { user, token } => {
                // Durable slot first: an API call scheduled right after
                // login must already see the token.
                self.inner.token_slot.set(token);
                app.user = Some(user);
            }
            Action::Logout => {
                self.inner.token_slot.clear();
                app.user = None;
            }
            Action::SetCatalog(sweets) => {
                app.catalog = sweets;
            }
            Action::AddSweet(sweet) => {
                app.catalog.push(sweet);
            }
            Action::UpdateSweet { id, patch } => {
                if let Some(sweet) = app.catalog.iter_mut().find(|s| s.id == id) {
                    patch.apply_to(sweet);
                }
            }
            Action::RemoveSweet(id) => {
                app.catalog.retain(|s| s.id != id);
            }
            Action::AddToCart { sweet, quantity } => {
                app.cart.add(&sweet, quantity);
            }
            Action::SetCartQuantity { id, quantity } => {
                app.cart.set_quantity(&id, quantity);
            }
            Action::RemoveFromCart(id) => {
                app.cart.remove(&id);
            }
            Action::ClearCart => {
                app.cart.clear();
            }
            Action::SetLoading(is_loading) => {
                app.is_loading = is_loading;
            }
            Action::SetError(error) => {
                app.error = error;
            }
        }
    }

    // =========================================================================
    // Convenience action methods
    // =========================================================================

    /// Establish a session. Idempotent for identical values.
    pub fn login(&self, user: CurrentUser, token: SecretString) {
        self.dispatch(Action::Login { user, token });
    }

    /// Clear the session and stored token. Never fails.
    pub fn logout(&self) {
        self.dispatch(Action::Logout);
    }

    /// Replace the catalog wholesale.
    pub fn set_catalog(&self, sweets: Vec<Sweet>) {
        self.dispatch(Action::SetCatalog(sweets));
    }

    /// Append a sweet to the catalog.
    pub fn add_sweet(&self, sweet: Sweet) {
        self.dispatch(Action::AddSweet(sweet));
    }

    /// Patch a catalog entry; silent no-op if the id is absent.
    pub fn update_sweet(&self, id: SweetId, patch: SweetPatch) {
        self.dispatch(Action::UpdateSweet { id, patch });
    }

    /// Remove a catalog entry by id.
    pub fn remove_sweet(&self, id: SweetId) {
        self.dispatch(Action::RemoveSweet(id));
    }

    /// Add units of a sweet to the cart.
    pub fn add_to_cart(&self, sweet: Sweet, quantity: u32) {
        self.dispatch(Action::AddToCart { sweet, quantity });
    }

    /// Set a cart line's exact quantity; zero removes the line.
    ///
    /// The returned [`CartChange`] says whether the line was updated,
    /// removed, or absent, so the caller can phrase the UI accordingly.
    pub fn set_cart_quantity(&self, id: &SweetId, quantity: u32) -> CartChange {
        let present = self
            .inner
            .state
            .lock()
            .app
            .cart
            .lines()
            .iter()
            .any(|l| &l.id == id);

        self.dispatch(Action::SetCartQuantity {
            id: id.clone(),
            quantity,
        });

        if !present {
            CartChange::Absent
        } else if quantity == 0 {
            CartChange::Removed
        } else {
            CartChange::Updated
        }
    }

    /// Remove a cart line by id.
    pub fn remove_from_cart(&self, id: SweetId) {
        self.dispatch(Action::RemoveFromCart(id));
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.dispatch(Action::ClearCart);
    }

    /// Total units across all cart lines. Read-only.
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.inner.state.lock().app.cart.item_count()
    }

    /// Overwrite the loading flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.dispatch(Action::SetLoading(is_loading));
    }

    /// Overwrite the error message.
    pub fn set_error(&self, error: Option<String>) {
        self.dispatch(Action::SetError(error));
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.inner.state.lock();
        f.debug_struct("Store")
            .field("state", &shared.app)
            .field("subscribers", &shared.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::token::TOKEN_SLOT_KEY;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use sweet_shop_core::{Email, Price, UserId};

    fn new_store() -> (Arc<MemoryStorage>, Store) {
        let storage = Arc::new(MemoryStorage::new());
        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let store = Store::new(
            Arc::clone(&storage) as Arc<dyn StorageAdapter>,
            token_slot,
        );
        (storage, store)
    }

    fn customer() -> CurrentUser {
        CurrentUser {
            id: UserId::new("u-1"),
            email: Email::parse("customer@example.com").unwrap(),
            is_admin: false,
        }
    }

    fn sweet(id: &str, price_cents: i64, stock: u32) -> Sweet {
        Sweet {
            id: SweetId::new(id),
            name: format!("Sweet {id}"),
            category: "gummy".to_string(),
            price: Price::new(Decimal::new(price_cents, 2)).unwrap(),
            quantity: stock,
            image_url: None,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    #[test]
    fn test_login_token_readable_from_slot_immediately() {
        let (storage, store) = new_store();
        store.login(customer(), SecretString::from("tok-live"));

        // The bare slot the API client reads must already hold the token
        assert_eq!(storage.get(TOKEN_SLOT_KEY), Some("tok-live".to_string()));
        assert!(store.state().is_logged_in());
    }

    #[test]
    fn test_logout_clears_session_and_both_slots() {
        let (storage, store) = new_store();
        store.login(customer(), SecretString::from("tok-live"));
        store.logout();

        assert!(store.state().user.is_none());
        assert_eq!(storage.get(TOKEN_SLOT_KEY), None);

        // A fresh rehydration from the same storage is signed out
        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let rehydrated = Store::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>, token_slot);
        assert!(rehydrated.state().user.is_none());
    }

    #[test]
    fn test_rehydration_reproduces_session_and_cart() {
        let (storage, store) = new_store();
        store.login(customer(), SecretString::from("tok-live"));
        store.add_to_cart(sweet("s-1", 1000, 5), 2);

        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let rehydrated = Store::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>, token_slot);

        let before = store.state();
        let after = rehydrated.state();
        assert_eq!(after.user, before.user);
        assert_eq!(after.cart, before.cart);
        // Catalog is ephemeral and comes back empty
        assert!(after.catalog.is_empty());
    }

    #[test]
    fn test_rehydration_mirrors_token_to_slot() {
        let (storage, store) = new_store();
        store.login(customer(), SecretString::from("tok-live"));

        // Simulate the bare slot going missing (the historical bug)
        storage.remove(TOKEN_SLOT_KEY);

        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let _rehydrated =
            Store::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>, token_slot.clone());

        assert!(token_slot.is_present());
        assert_eq!(storage.get(TOKEN_SLOT_KEY), Some("tok-live".to_string()));
    }

    #[test]
    fn test_malformed_persisted_state_starts_at_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORAGE_KEY, "{definitely not json");

        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let store = Store::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>, token_slot);

        let state = store.state();
        assert!(state.user.is_none());
        assert!(state.cart.is_empty());
        assert!(state.catalog.is_empty());
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[test]
    fn test_set_catalog_does_not_prune_cart() {
        let (_, store) = new_store();
        store.add_to_cart(sweet("s-1", 100, 5), 1);
        store.set_catalog(vec![sweet("s-2", 200, 3)]);

        // Dangling cart reference is tolerated by design
        assert_eq!(store.state().cart.lines().len(), 1);
        assert_eq!(store.state().cart.lines()[0].id, SweetId::new("s-1"));
    }

    #[test]
    fn test_update_sweet_absent_id_is_noop() {
        let (_, store) = new_store();
        store.set_catalog(vec![sweet("s-1", 100, 5)]);
        store.update_sweet(SweetId::new("ghost"), SweetPatch::stock(99));

        assert_eq!(store.state().catalog, vec![sweet("s-1", 100, 5)]);
    }

    #[test]
    fn test_update_and_remove_sweet() {
        let (_, store) = new_store();
        store.set_catalog(vec![sweet("s-1", 100, 5), sweet("s-2", 200, 3)]);

        store.update_sweet(SweetId::new("s-1"), SweetPatch::stock(4));
        assert_eq!(
            store.state().sweet(&SweetId::new("s-1")).unwrap().quantity,
            4
        );

        store.remove_sweet(SweetId::new("s-2"));
        assert_eq!(store.state().catalog.len(), 1);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[test]
    fn test_add_to_cart_merges_and_counts() {
        let (_, store) = new_store();
        let s = sweet("s-1", 1000, 5);
        store.add_to_cart(s.clone(), 2);
        store.add_to_cart(s, 1);

        let state = store.state();
        assert_eq!(state.cart.lines().len(), 1);
        assert_eq!(state.cart.lines()[0].quantity, 3);
        assert_eq!(store.cart_item_count(), 3);
    }

    #[test]
    fn test_set_cart_quantity_zero_signals_removed() {
        let (_, store) = new_store();
        let s = sweet("s-1", 100, 5);
        store.add_to_cart(s.clone(), 2);

        assert_eq!(store.set_cart_quantity(&s.id, 0), CartChange::Removed);
        assert!(store.state().cart.is_empty());

        assert_eq!(
            store.set_cart_quantity(&SweetId::new("ghost"), 3),
            CartChange::Absent
        );
    }

    // =========================================================================
    // Subscribers
    // =========================================================================

    #[test]
    fn test_subscribers_notified_with_snapshot() {
        let (_, store) = new_store();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        store.subscribe(move |state| {
            seen_clone.store(state.cart.item_count() as usize, Ordering::SeqCst);
        });

        store.add_to_cart(sweet("s-1", 100, 5), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reentrant_dispatch_is_deferred_not_deadlocked() {
        let (_, store) = new_store();
        let store_clone = store.clone();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);

        store.subscribe(move |state| {
            // Re-enter the store from inside the notification pass once
            if state.error.is_none() && fired_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                store_clone.set_error(Some("from subscriber".to_string()));
            }
        });

        store.set_loading(true);

        let state = store.state();
        assert!(state.is_loading);
        assert_eq!(state.error.as_deref(), Some("from subscriber"));
    }

    #[test]
    fn test_loading_and_error_flags_last_write_wins() {
        let (_, store) = new_store();
        store.set_error(Some("first".to_string()));
        store.set_error(Some("second".to_string()));
        assert_eq!(store.state().error.as_deref(), Some("second"));

        store.set_error(None);
        assert!(store.state().error.is_none());
    }
}

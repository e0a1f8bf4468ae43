//! Persistence of the store's durable subset.
//!
//! Only `{user, token, cart}` survive a restart; the catalog and the
//! transient UI flags are rebuilt from the API each session. The subset is
//! serialized as a single JSON object under a fixed namespaced key.
//!
//! Rehydration is tolerant: a missing key, malformed JSON, or an
//! unrecognized schema falls back to the default empty state. That path is
//! logged and recovered locally, never surfaced to the user and never
//! fatal.

use serde::{Deserialize, Serialize};

use sweet_shop_core::CurrentUser;

use crate::storage::StorageAdapter;
use crate::store::cart::Cart;

/// Namespaced storage key for the persisted subset.
pub const STORAGE_KEY: &str = "sweet-shop-storage";

/// The durable subset of [`AppState`](crate::store::AppState).
///
/// No versioning field; schema changes must keep parsing tolerant
/// (`serde(default)` on every field).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    /// The signed-in user, if any.
    #[serde(default)]
    pub user: Option<CurrentUser>,
    /// The bearer token, stored in the clear. Mirrored into the bare
    /// token slot on rehydration.
    #[serde(default)]
    pub token: Option<String>,
    /// The pending cart.
    #[serde(default)]
    pub cart: Cart,
}

/// Read and parse the persisted subset, falling back to defaults.
pub fn load(storage: &dyn StorageAdapter) -> PersistedState {
    let Some(raw) = storage.get(STORAGE_KEY) else {
        return PersistedState::default();
    };

    match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Malformed persisted state, starting from defaults"
            );
            PersistedState::default()
        }
    }
}

/// Serialize and write the persisted subset.
pub fn save(storage: &dyn StorageAdapter, state: &PersistedState) {
    match serde_json::to_string(state) {
        Ok(raw) => storage.set(STORAGE_KEY, &raw),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize persisted state");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use rust_decimal::Decimal;
    use sweet_shop_core::{Email, Price, Sweet, SweetId, UserId};

    fn populated() -> PersistedState {
        let mut cart = Cart::default();
        cart.add(
            &Sweet {
                id: SweetId::new("s-1"),
                name: "Toffee".to_string(),
                category: "caramel".to_string(),
                price: Price::new(Decimal::new(150, 2)).unwrap(),
                quantity: 9,
                image_url: None,
            },
            2,
        );
        PersistedState {
            user: Some(CurrentUser {
                id: UserId::new("u-1"),
                email: Email::parse("customer@example.com").unwrap(),
                is_admin: false,
            }),
            token: Some("tok-abc".to_string()),
            cart,
        }
    }

    #[test]
    fn test_save_load_roundtrip_is_value_equal() {
        let storage = MemoryStorage::new();
        let state = populated();
        save(&storage, &state);

        let restored = load(&storage);
        assert_eq!(restored.user, state.user);
        assert_eq!(restored.token, state.token);
        assert_eq!(restored.cart, state.cart);
    }

    #[test]
    fn test_load_missing_key_yields_defaults() {
        let storage = MemoryStorage::new();
        let restored = load(&storage);
        assert!(restored.user.is_none());
        assert!(restored.token.is_none());
        assert!(restored.cart.is_empty());
    }

    #[test]
    fn test_load_malformed_json_yields_defaults() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "{not json at all");

        let restored = load(&storage);
        assert!(restored.user.is_none());
        assert!(restored.token.is_none());
        assert!(restored.cart.is_empty());
    }

    #[test]
    fn test_load_partial_schema_fills_defaults() {
        // A pre-cart version of the persisted blob
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, r#"{"token": "tok-old"}"#);

        let restored = load(&storage);
        assert_eq!(restored.token, Some("tok-old".to_string()));
        assert!(restored.user.is_none());
        assert!(restored.cart.is_empty());
    }
}

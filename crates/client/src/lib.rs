//! Sweet Shop client library.
//!
//! The single source of truth for session, catalog, and cart state, plus the
//! REST API client that talks to the Sweet Shop server.
//!
//! # Architecture
//!
//! - [`store`] - The application [`Store`](store::Store): typed actions, an
//!   exhaustive reducer, subscriber notification, and write-through
//!   persistence of the `{user, token, cart}` subset
//! - [`storage`] - Durable string key-value storage behind the
//!   [`StorageAdapter`](storage::StorageAdapter) trait
//! - [`token`] - The [`TokenSlot`](token::TokenSlot), the one accessor for
//!   the bearer token shared by the store and the API client
//! - [`api`] - The [`ApiClient`](api::ApiClient) REST wrapper
//! - [`checkout`] - Sequential cart checkout with per-line outcomes
//! - [`config`] - Environment-driven configuration
//! - [`error`] - API error taxonomy and user-facing message translation
//!
//! # Data flow
//!
//! View -> store action -> (optionally) API client -> store mutation ->
//! persisted subset written -> subscribers notified -> view re-renders.
//!
//! The store itself never talks to the network; every store operation is
//! synchronous and total. Network failures live in [`error::ApiError`] and
//! are surfaced to the view layer, never to the store's own transitions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod token;

pub use api::ApiClient;
pub use checkout::{checkout, CheckoutOutcome};
pub use config::{ClientConfig, ConfigError};
pub use error::{user_message, ApiError};
pub use storage::{FileStorage, MemoryStorage, StorageAdapter};
pub use store::{Action, AppState, CartChange, Store};
pub use token::TokenSlot;

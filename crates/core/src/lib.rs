//! Sweet Shop Core - Shared domain types.
//!
//! This crate provides the common types used across the Sweet Shop client
//! components:
//! - `client` - Application store, persistence, and REST API client
//! - `cli` - The `sweet-shop` command-line frontend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails,
//!   plus the catalog, session, and order entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Volt Core - Shared types library.
//!
//! This crate provides common types used across all Volt components:
//! - `storefront` - JSON API server (auth, cart, wishlist, checkout)
//! - `client` - Cart reconciliation engine and checkout orchestrator
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and roles
//! - [`cart`] - Cart and wishlist domain types with the total-price invariant
//! - [`catalog`] - The static product catalog
//! - [`api`] - Wire types shared by the server and the client transport

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, LineItem, Wishlist, WishlistEntry, cart_total};
pub use catalog::{Catalog, Product};
pub use types::*;

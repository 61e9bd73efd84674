//! Volt Client - Cart reconciliation engine and checkout orchestrator.
//!
//! This crate is the stateful side of the storefront: it keeps a local
//! working copy of the cart and wishlist, persists it for guests, and
//! reconciles it with the server across login and logout.
//!
//! # Reconciliation model
//!
//! - Guests own their state: every mutation lands in a [`storage::GuestStore`]
//!   under well-known keys, and nothing touches the network.
//! - Logged-in sessions treat the server as authoritative: mutations apply
//!   locally first (optimistic) and are pushed best-effort; a failed push
//!   never rolls the local state back.
//! - Login is the only moment the two worlds meet. The guest cart rides
//!   along on the login call and the server decides the merge (it only
//!   applies when the server cart is empty). The guest wishlist is merged
//!   client-side as a per-item union. Guest storage is cleared afterwards
//!   in both cases, whatever the outcome.
//!
//! # Modules
//!
//! - [`storage`] - Guest-side key/value persistence
//! - [`transport`] - Traits the engine speaks through, HTTP implementation
//!   in [`http`]
//! - [`cart`] / [`wishlist`] - The reconciling sessions
//! - [`checkout`] - The checkout state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod error;
pub mod http;
pub mod storage;
pub mod transport;
pub mod wishlist;

pub use cart::CartSession;
pub use checkout::{Checkout, CheckoutState, OrderQuote};
pub use error::ClientError;
pub use http::HttpTransport;
pub use wishlist::WishlistSession;

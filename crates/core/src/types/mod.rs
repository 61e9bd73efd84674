//! Core types for the Volt storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use id::{ProductId, UserId};
pub use role::Role;

//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - User authentication (argon2 passwords, JWT sessions)
//! - `tokens` - Signed access/refresh token issuance and verification
//! - `payment` - Payment gateway client (order creation, signature checks)

pub mod auth;
pub mod payment;
pub mod tokens;

//! Integration tests for Volt Electronics.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the storefront
//! docker compose up -d postgres
//! cargo run -p volt-storefront
//!
//! # Run integration tests
//! cargo test -p volt-integration-tests -- --include-ignored
//! ```
//!
//! Tests marked `#[ignore]` need a live storefront; the rest run the
//! client engine against in-process fakes and need nothing.

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store, so login cookies carry across calls.
#[must_use]
pub fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway account email per test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@volt.test", uuid::Uuid::new_v4().simple())
}

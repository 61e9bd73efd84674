//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Products
//! GET  /products               - Catalog listing
//! GET  /products/{id}          - Single product
//!
//! # Cart (requires auth)
//! GET    /cart                 - Fetch cart (created lazily)
//! POST   /cart/add             - Add or increment a line
//! PUT    /cart/update          - Set a line's quantity
//! DELETE /cart/remove/{id}     - Remove a line
//! DELETE /cart/clear           - Empty the cart
//!
//! # Wishlist (requires auth)
//! GET    /wishlist             - Fetch wishlist
//! POST   /wishlist/add         - Save a product (idempotent)
//! DELETE /wishlist/remove/{id} - Unsave a product
//!
//! # Auth
//! POST /auth/register          - Create account, open session
//! POST /auth/login             - Open session, gated cart merge
//! POST /auth/logout            - Close session (requires auth)
//! POST /auth/refresh           - Rotate the token pair
//! GET  /auth/me                - Current account (requires auth)
//!
//! # Checkout
//! POST /checkout/order         - Register an order with the gateway
//! POST /checkout/verify        - Verify a captured payment's signature
//! GET  /checkout/key           - Publishable gateway key
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::me))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", put(cart::update))
        .route("/remove/{product_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove/{product_id}", delete(wishlist::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(checkout::create_order))
        .route("/verify", post(checkout::verify_order))
        .route("/key", get(checkout::gateway_key))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .nest("/checkout", checkout_routes())
}

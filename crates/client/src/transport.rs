//! Transport traits the engine speaks through.
//!
//! The sessions are generic over these traits so the reconciliation
//! logic can be exercised against in-memory fakes; [`crate::http`]
//! provides the real implementation over the storefront JSON API.

use volt_core::ProductId;
use volt_core::api::{
    AddCartItem, CartBody, CreateOrderRequest, CreateOrderResponse, LoginRequest, LoginResponse,
    RegisterRequest, UpdateCartItem, UserBody, VerifyOrderRequest, WishlistBody,
};

use crate::error::ClientError;

/// Server-side cart operations.
pub trait CartTransport {
    /// Fetch the account's cart.
    async fn fetch_cart(&self) -> Result<CartBody, ClientError>;

    /// Add a line or increment an existing one.
    async fn add_item(&self, req: &AddCartItem) -> Result<CartBody, ClientError>;

    /// Set a line's quantity.
    async fn update_item(&self, req: &UpdateCartItem) -> Result<CartBody, ClientError>;

    /// Remove a line.
    async fn remove_item(&self, product_id: &ProductId) -> Result<CartBody, ClientError>;

    /// Empty the cart.
    async fn clear_cart(&self) -> Result<(), ClientError>;
}

/// Server-side wishlist operations.
pub trait WishlistTransport {
    /// Fetch the account's wishlist.
    async fn fetch_wishlist(&self) -> Result<WishlistBody, ClientError>;

    /// Save a product; idempotent by product id.
    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistBody, ClientError>;

    /// Unsave a product.
    async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ClientError>;
}

/// Session management operations.
pub trait AuthTransport {
    /// Open a session. The guest cart rides along for the server-side
    /// merge decision; the response carries the cart to adopt.
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError>;

    /// Create an account and open a session.
    async fn register(&self, req: &RegisterRequest) -> Result<UserBody, ClientError>;

    /// Close the session.
    async fn logout(&self) -> Result<(), ClientError>;

    /// Current account, if the session is valid.
    async fn me(&self) -> Result<UserBody, ClientError>;
}

/// Checkout operations.
pub trait CheckoutTransport {
    /// Register an order with the payment gateway.
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError>;

    /// Verify a captured payment.
    async fn verify_order(&self, req: &VerifyOrderRequest) -> Result<(), ClientError>;

    /// Publishable gateway key for the payment UI.
    async fn gateway_key(&self) -> Result<String, ClientError>;
}

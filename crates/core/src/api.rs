//! Wire types for the storefront JSON API.
//!
//! Shared by the server route handlers and the client transport so the two
//! sides cannot drift. Field names are camelCase on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineItem, Wishlist, WishlistEntry};
use crate::types::{Email, ProductId, Role, UserId};

/// Generic `{"success": true}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    /// The affirmative acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Cart
// =============================================================================

/// Cart as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBody {
    pub products: Vec<LineItem>,
    pub total_price: Decimal,
}

impl From<Cart> for CartBody {
    fn from(cart: Cart) -> Self {
        Self {
            products: cart.items,
            total_price: cart.total_price,
        }
    }
}

/// Response for all cart reads and mutations that return the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: CartBody,
}

impl CartResponse {
    /// Wrap a cart in the standard success envelope.
    #[must_use]
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            success: true,
            cart: cart.into(),
        }
    }
}

/// `POST /cart/add` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_at_time: Decimal,
}

/// `PUT /cart/update` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Wishlist
// =============================================================================

/// Wishlist as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistBody {
    pub products: Vec<WishlistEntry>,
}

impl From<Wishlist> for WishlistBody {
    fn from(wishlist: Wishlist) -> Self {
        Self {
            products: wishlist.entries,
        }
    }
}

/// Response for wishlist reads and additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistResponse {
    pub success: bool,
    pub wishlist: WishlistBody,
}

impl WishlistResponse {
    /// Wrap a wishlist in the standard success envelope.
    #[must_use]
    pub fn from_wishlist(wishlist: Wishlist) -> Self {
        Self {
            success: true,
            wishlist: wishlist.into(),
        }
    }
}

/// `POST /wishlist/add` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItem {
    pub product_id: ProductId,
}

// =============================================================================
// Auth
// =============================================================================

/// Public view of a user account. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// `POST /auth/login` request.
///
/// `local_cart` carries the guest cart for the one-shot merge decision; it
/// is only applied when the server cart is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_cart: Option<Vec<LineItem>>,
}

/// `POST /auth/register` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response: the user plus the post-merge cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserBody,
    pub cart: CartBody,
}

/// `POST /auth/register` and `GET /auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserBody,
}

// =============================================================================
// Checkout
// =============================================================================

/// `POST /checkout/order` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Order total in major currency units.
    pub amount: Decimal,
    /// ISO currency code; the server defaults this when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// `POST /checkout/order` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Amount in minor currency units, as the gateway quotes it.
    pub amount: i64,
    pub currency: String,
}

/// `POST /checkout/verify` request: identifiers returned by the gateway's
/// completion callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// `GET /checkout/key` response: the public gateway key for the client UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayKeyResponse {
    pub key_id: String,
}

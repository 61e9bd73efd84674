//! Cart route handlers.
//!
//! All cart routes require a logged-in account. The cart is created
//! lazily on first access, and every mutation responds with the full
//! post-mutation cart so the client can overwrite its local copy.

use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;

use volt_core::api::{Ack, AddCartItem, CartResponse, UpdateCartItem};
use volt_core::{LineItem, ProductId};

use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `GET /cart`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool()).get_or_create(user.id).await?;
    Ok(Json(CartResponse::from_cart(cart)))
}

/// `POST /cart/add`
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddCartItem>,
) -> Result<Json<CartResponse>> {
    if req.price_at_time < Decimal::ZERO {
        return Err(AppError::BadRequest("priceAtTime must not be negative".to_owned()));
    }

    let item = LineItem::new(req.product_id, req.quantity, req.price_at_time);
    let cart = CartRepository::new(state.pool())
        .add_or_increment(user.id, &item)
        .await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// `PUT /cart/update`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdateCartItem>,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool())
        .update_quantity(user.id, &req.product_id, req.quantity)
        .await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// `DELETE /cart/remove/{product_id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool())
        .remove_item(user.id, &ProductId::new(product_id))
        .await?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// `DELETE /cart/clear`
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Ack>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(Ack::ok()))
}

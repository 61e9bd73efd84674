//! Wishlist route handlers.
//!
//! Adds are idempotent by product id, which the client's union merge on
//! login relies on. Removing an absent product still acknowledges.

use axum::Json;
use axum::extract::{Path, State};

use volt_core::ProductId;
use volt_core::api::{Ack, AddWishlistItem, WishlistResponse};

use crate::db::wishlists::WishlistRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `GET /wishlist`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<WishlistResponse>> {
    let wishlist = WishlistRepository::new(state.pool()).get(user.id).await?;
    Ok(Json(WishlistResponse::from_wishlist(wishlist)))
}

/// `POST /wishlist/add`
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddWishlistItem>,
) -> Result<Json<WishlistResponse>> {
    let wishlist = WishlistRepository::new(state.pool())
        .add(user.id, &req.product_id)
        .await?;

    Ok(Json(WishlistResponse::from_wishlist(wishlist)))
}

/// `DELETE /wishlist/remove/{product_id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Json<Ack>> {
    WishlistRepository::new(state.pool())
        .remove(user.id, &ProductId::new(product_id))
        .await?;

    Ok(Json(Ack::ok()))
}

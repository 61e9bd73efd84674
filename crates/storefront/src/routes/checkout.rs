//! Checkout route handlers.
//!
//! The server's part of checkout is narrow: register the order with the
//! payment gateway and verify the captured payment's signature. No order
//! record is persisted.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;

use volt_core::api::{
    Ack, CreateOrderRequest, CreateOrderResponse, GatewayKeyResponse, VerifyOrderRequest,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Currency used when the request does not name one.
const DEFAULT_CURRENCY: &str = "INR";

/// `POST /checkout/order`
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be positive".to_owned()));
    }

    let currency = req.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let receipt = format!("rcpt_{}", uuid::Uuid::new_v4().simple());

    let order = state
        .payment()
        .create_order(req.amount, currency, &receipt)
        .await?;

    tracing::info!(order_id = %order.id, amount = order.amount, "gateway order created");

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
    }))
}

/// `POST /checkout/verify`
pub async fn verify_order(
    State(state): State<AppState>,
    Json(req): Json<VerifyOrderRequest>,
) -> Result<Json<Ack>> {
    if req.order_id.is_empty() || req.payment_id.is_empty() || req.signature.is_empty() {
        return Err(AppError::BadRequest("missing payment parameters".to_owned()));
    }

    state
        .payment()
        .verify_signature(&req.order_id, &req.payment_id, &req.signature)?;

    tracing::info!(order_id = %req.order_id, "payment verified");

    Ok(Json(Ack::ok()))
}

/// `GET /checkout/key`
pub async fn gateway_key(State(state): State<AppState>) -> Json<GatewayKeyResponse> {
    Json(GatewayKeyResponse {
        key_id: state.payment().key_id().to_owned(),
    })
}

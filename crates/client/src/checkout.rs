//! The checkout orchestrator.
//!
//! A small state machine: `Reviewing -> Submitting -> Confirmed` or
//! `Failed`. Cash on delivery confirms immediately; gateway payment goes
//! through order creation and signature verification. Confirmation clears
//! the cart; failure preserves it and leaves the checkout retryable.
//!
//! No order record is persisted anywhere. A confirmed checkout carries a
//! display-only order reference.

use rand::Rng;
use rust_decimal::Decimal;

use volt_core::api::{CreateOrderRequest, CreateOrderResponse, VerifyOrderRequest};

use crate::cart::CartSession;
use crate::error::ClientError;
use crate::storage::GuestStore;
use crate::transport::{CartTransport, CheckoutTransport};

/// Currency all gateway orders are placed in.
pub const CURRENCY: &str = "INR";

/// Order subtotal at or above which shipping is free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Flat shipping charge below the threshold.
const SHIPPING_FLAT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Where a checkout attempt stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Amounts shown, nothing submitted.
    Reviewing,
    /// A payment attempt is in flight.
    Submitting,
    /// Payment accepted. Carries the display-only order reference.
    Confirmed {
        /// `VE-` plus six random alphanumerics.
        reference: String,
    },
    /// Payment failed or was rejected.
    Failed {
        /// Whether another attempt may be made from this state.
        retryable: bool,
    },
}

/// The amounts a checkout was quoted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuote {
    /// Cart subtotal at captured prices.
    pub subtotal: Decimal,
    /// Shipping charge under the free-shipping rule.
    pub shipping: Decimal,
    /// `subtotal + shipping`.
    pub total: Decimal,
}

impl OrderQuote {
    /// Quote a subtotal: free shipping at or above the threshold, a flat
    /// charge below it.
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal) -> Self {
        let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            SHIPPING_FLAT
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// Clears a cart after a confirmed checkout.
///
/// Implemented by [`CartSession`]; tests substitute a recorder.
pub trait CartHandle {
    /// Empty the cart.
    async fn clear_cart(&mut self) -> Result<(), ClientError>;
}

impl<T: CartTransport, S: GuestStore> CartHandle for CartSession<T, S> {
    async fn clear_cart(&mut self) -> Result<(), ClientError> {
        self.clear().await
    }
}

/// One checkout attempt over a fixed quote.
pub struct Checkout<T: CheckoutTransport> {
    transport: T,
    quote: OrderQuote,
    state: CheckoutState,
}

impl<T: CheckoutTransport> Checkout<T> {
    /// Start reviewing a checkout for a non-empty cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::EmptyCart` if the subtotal is not positive.
    pub fn new(transport: T, subtotal: Decimal) -> Result<Self, ClientError> {
        if subtotal <= Decimal::ZERO {
            return Err(ClientError::EmptyCart);
        }
        Ok(Self {
            transport,
            quote: OrderQuote::for_subtotal(subtotal),
            state: CheckoutState::Reviewing,
        })
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The quoted amounts.
    #[must_use]
    pub const fn quote(&self) -> &OrderQuote {
        &self.quote
    }

    /// Confirm a cash-on-delivery order.
    ///
    /// No gateway involvement; the order is confirmed directly and the
    /// cart cleared.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidCheckoutState` unless the checkout is
    /// reviewing or retryably failed.
    pub async fn confirm_cash<C: CartHandle>(
        &mut self,
        cart: &mut C,
    ) -> Result<&CheckoutState, ClientError> {
        self.ensure_submittable()?;

        self.state = CheckoutState::Submitting;
        self.confirm(cart).await;
        Ok(&self.state)
    }

    /// Register a gateway order for the quoted total.
    ///
    /// Moves to `Submitting` on success. A gateway error moves to
    /// `Failed { retryable: true }` and is returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidCheckoutState` unless the checkout is
    /// reviewing or retryably failed; otherwise the transport error.
    pub async fn create_gateway_order(&mut self) -> Result<CreateOrderResponse, ClientError> {
        self.ensure_submittable()?;

        let req = CreateOrderRequest {
            amount: self.quote.total,
            currency: Some(CURRENCY.to_owned()),
        };

        match self.transport.create_order(&req).await {
            Ok(order) => {
                self.state = CheckoutState::Submitting;
                Ok(order)
            }
            Err(e) => {
                self.state = CheckoutState::Failed { retryable: true };
                Err(e)
            }
        }
    }

    /// Submit the gateway's completion for verification.
    ///
    /// A verified signature confirms the order and clears the cart; a
    /// mismatch or gateway error fails retryably and preserves the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidCheckoutState` if no gateway order is
    /// in flight.
    pub async fn complete_gateway<C: CartHandle>(
        &mut self,
        completion: &VerifyOrderRequest,
        cart: &mut C,
    ) -> Result<&CheckoutState, ClientError> {
        if self.state != CheckoutState::Submitting {
            return Err(ClientError::InvalidCheckoutState(
                "no gateway order in flight",
            ));
        }

        match self.transport.verify_order(completion).await {
            Ok(()) => self.confirm(cart).await,
            Err(e) => {
                tracing::warn!(error = %e, "payment verification failed");
                self.state = CheckoutState::Failed { retryable: true };
            }
        }
        Ok(&self.state)
    }

    /// Confirm and clear the cart. A failed clear is logged; the order is
    /// confirmed regardless.
    async fn confirm<C: CartHandle>(&mut self, cart: &mut C) {
        if let Err(e) = cart.clear_cart().await {
            tracing::warn!(error = %e, "cart clear after confirmation failed");
        }
        self.state = CheckoutState::Confirmed {
            reference: order_reference(),
        };
    }

    fn ensure_submittable(&self) -> Result<(), ClientError> {
        match self.state {
            CheckoutState::Reviewing | CheckoutState::Failed { retryable: true } => Ok(()),
            _ => Err(ClientError::InvalidCheckoutState(
                "checkout already submitted",
            )),
        }
    }
}

/// Display-only order reference: `VE-` plus six random alphanumerics.
fn order_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)).to_ascii_uppercase())
        .collect();
    format!("VE-{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeGateway {
        orders: Mutex<u32>,
        reject_signature: bool,
    }

    impl CheckoutTransport for &FakeGateway {
        async fn create_order(
            &self,
            req: &CreateOrderRequest,
        ) -> Result<CreateOrderResponse, ClientError> {
            let mut orders = self.orders.lock().unwrap();
            *orders += 1;
            let minor = (req.amount * Decimal::from(100)).trunc();
            Ok(CreateOrderResponse {
                order_id: format!("order_{orders}"),
                amount: minor.to_string().parse().unwrap(),
                currency: req.currency.clone().unwrap_or_else(|| CURRENCY.to_owned()),
            })
        }

        async fn verify_order(&self, _req: &VerifyOrderRequest) -> Result<(), ClientError> {
            if self.reject_signature {
                return Err(ClientError::Api {
                    status: 400,
                    message: "Payment verification failed".to_owned(),
                });
            }
            Ok(())
        }

        async fn gateway_key(&self) -> Result<String, ClientError> {
            Ok("key_test".to_owned())
        }
    }

    #[derive(Default)]
    struct RecordingCart {
        cleared: u32,
    }

    impl CartHandle for RecordingCart {
        async fn clear_cart(&mut self) -> Result<(), ClientError> {
            self.cleared += 1;
            Ok(())
        }
    }

    fn completion(order_id: &str) -> VerifyOrderRequest {
        VerifyOrderRequest {
            order_id: order_id.to_owned(),
            payment_id: "pay_1".to_owned(),
            signature: "sig".to_owned(),
        }
    }

    #[test]
    fn test_quote_shipping_threshold() {
        let below = OrderQuote::for_subtotal("99.99".parse().unwrap());
        assert_eq!(below.shipping, Decimal::from(12));
        assert_eq!(below.total, "111.99".parse::<Decimal>().unwrap());

        let at = OrderQuote::for_subtotal(Decimal::from(100));
        assert_eq!(at.shipping, Decimal::ZERO);
        assert_eq!(at.total, Decimal::from(100));
    }

    #[test]
    fn test_empty_cart_cannot_checkout() {
        let gateway = FakeGateway::default();
        assert!(matches!(
            Checkout::new(&gateway, Decimal::ZERO),
            Err(ClientError::EmptyCart)
        ));
    }

    #[test]
    fn test_order_reference_shape() {
        let reference = order_reference();
        assert!(reference.starts_with("VE-"));
        assert_eq!(reference.len(), 9);
        assert!(reference[3..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_cash_confirms_and_clears_cart() {
        let gateway = FakeGateway::default();
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(50)).unwrap();

        let state = checkout.confirm_cash(&mut cart).await.unwrap();

        assert!(matches!(state, CheckoutState::Confirmed { .. }));
        assert_eq!(cart.cleared, 1);
        // Cash never touches the gateway.
        assert_eq!(*gateway.orders.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_gateway_success_confirms_and_clears() {
        let gateway = FakeGateway::default();
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(150)).unwrap();

        let order = checkout.create_gateway_order().await.unwrap();
        assert_eq!(order.amount, 15_000);
        assert_eq!(order.currency, CURRENCY);
        assert_eq!(checkout.state(), &CheckoutState::Submitting);

        let state = checkout
            .complete_gateway(&completion(&order.order_id), &mut cart)
            .await
            .unwrap();
        assert!(matches!(state, CheckoutState::Confirmed { .. }));
        assert_eq!(cart.cleared, 1);
    }

    #[tokio::test]
    async fn test_gateway_rejection_fails_retryably_and_preserves_cart() {
        let gateway = FakeGateway {
            orders: Mutex::new(0),
            reject_signature: true,
        };
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(50)).unwrap();

        let order = checkout.create_gateway_order().await.unwrap();
        let state = checkout
            .complete_gateway(&completion(&order.order_id), &mut cart)
            .await
            .unwrap();

        assert_eq!(state, &CheckoutState::Failed { retryable: true });
        assert_eq!(cart.cleared, 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let gateway = FakeGateway::default();
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(50)).unwrap();

        // First attempt fails at verification.
        let order = checkout.create_gateway_order().await.unwrap();
        checkout.state = CheckoutState::Failed { retryable: true };

        // Retry from the failed state.
        let retry = checkout.create_gateway_order().await.unwrap();
        assert_ne!(retry.order_id, order.order_id);
        let state = checkout
            .complete_gateway(&completion(&retry.order_id), &mut cart)
            .await
            .unwrap();
        assert!(matches!(state, CheckoutState::Confirmed { .. }));
    }

    #[tokio::test]
    async fn test_confirmed_checkout_cannot_resubmit() {
        let gateway = FakeGateway::default();
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(50)).unwrap();
        checkout.confirm_cash(&mut cart).await.unwrap();

        assert!(matches!(
            checkout.confirm_cash(&mut cart).await,
            Err(ClientError::InvalidCheckoutState(_))
        ));
        assert!(matches!(
            checkout.create_gateway_order().await,
            Err(ClientError::InvalidCheckoutState(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_without_order_in_flight_rejected() {
        let gateway = FakeGateway::default();
        let mut cart = RecordingCart::default();
        let mut checkout = Checkout::new(&gateway, Decimal::from(50)).unwrap();

        assert!(matches!(
            checkout.complete_gateway(&completion("order_x"), &mut cart).await,
            Err(ClientError::InvalidCheckoutState(_))
        ));
    }
}

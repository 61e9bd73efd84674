//! Payment gateway client.
//!
//! Orders are created server-side against the gateway's REST API with
//! basic auth, and captured payments are verified by recomputing the
//! gateway's HMAC-SHA256 signature over `"{order_id}|{payment_id}"` and
//! comparing in constant time.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when interacting with the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("gateway error: {status} - {message}")]
    Gateway { status: u16, message: String },

    /// Order amount could not be expressed in minor units.
    #[error("invalid order amount: {0}")]
    InvalidAmount(Decimal),

    /// Payment signature did not match.
    #[error("payment signature mismatch")]
    SignatureMismatch,
}

/// An order registered with the gateway, awaiting payment.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order ID.
    pub id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Payment gateway API client.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl PaymentClient {
    /// Create a new payment gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// The publishable key the browser checkout widget needs.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Register an order with the gateway.
    ///
    /// `amount` is in major currency units and is converted to minor
    /// units on the wire.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` if the amount is not a
    /// positive number of minor units.
    /// Returns `PaymentError::Gateway` if the gateway rejects the order.
    pub async fn create_order(
        &self,
        amount: Decimal,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let minor_units = (amount * Decimal::from(100))
            .round()
            .to_i64()
            .filter(|n| *n > 0)
            .ok_or(PaymentError::InvalidAmount(amount))?;

        let url = format!("{}/orders", self.config.api_base);
        let body = CreateOrderBody {
            amount: minor_units,
            currency,
            receipt,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Verify a captured payment's signature.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::SignatureMismatch` if the signature does not
    /// match the expected HMAC.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let expected = self.sign(order_id, payment_id);

        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            Err(PaymentError::SignatureMismatch)
        }
    }

    fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(
            self.config.key_secret.expose_secret().as_bytes(),
        )
        .expect("HMAC accepts keys of any length");
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> PaymentClient {
        PaymentClient::new(PaymentConfig {
            key_id: "key_test_abc".to_owned(),
            key_secret: SecretString::from("gateway-secret"),
            api_base: "https://gateway.invalid/v1".to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn test_signature_round_trip() {
        let client = client();
        let sig = client.sign("order_1", "pay_1");

        assert!(client.verify_signature("order_1", "pay_1", &sig).is_ok());
        assert!(matches!(
            client.verify_signature("order_1", "pay_2", &sig),
            Err(PaymentError::SignatureMismatch)
        ));
        assert!(matches!(
            client.verify_signature("order_1", "pay_1", "deadbeef"),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let client = client();
        let sig = client.sign("order_1", "pay_1");

        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

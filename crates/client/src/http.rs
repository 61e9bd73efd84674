//! HTTP implementation of the transport traits.
//!
//! One `reqwest` client with an enabled cookie store carries the session
//! cookies across all four transports, so a login through
//! [`AuthTransport`] authenticates subsequent cart and wishlist calls.

use serde::de::DeserializeOwned;

use volt_core::ProductId;
use volt_core::api::{
    Ack, AddCartItem, AddWishlistItem, CartBody, CartResponse, CreateOrderRequest,
    CreateOrderResponse, ErrorBody, GatewayKeyResponse, LoginRequest, LoginResponse,
    RegisterRequest, UpdateCartItem, UserBody, UserResponse, VerifyOrderRequest, WishlistBody,
    WishlistResponse,
};

use crate::error::ClientError;
use crate::transport::{AuthTransport, CartTransport, CheckoutTransport, WishlistTransport};

/// HTTP transport over the storefront JSON API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against a storefront base URL.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl CartTransport for HttpTransport {
    async fn fetch_cart(&self) -> Result<CartBody, ClientError> {
        let response = self.client.get(self.url("/cart")).send().await?;
        let body: CartResponse = Self::decode(response).await?;
        Ok(body.cart)
    }

    async fn add_item(&self, req: &AddCartItem) -> Result<CartBody, ClientError> {
        let response = self.client.post(self.url("/cart/add")).json(req).send().await?;
        let body: CartResponse = Self::decode(response).await?;
        Ok(body.cart)
    }

    async fn update_item(&self, req: &UpdateCartItem) -> Result<CartBody, ClientError> {
        let response = self.client.put(self.url("/cart/update")).json(req).send().await?;
        let body: CartResponse = Self::decode(response).await?;
        Ok(body.cart)
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<CartBody, ClientError> {
        let url = self.url(&format!("/cart/remove/{}", product_id.as_str()));
        let response = self.client.delete(url).send().await?;
        let body: CartResponse = Self::decode(response).await?;
        Ok(body.cart)
    }

    async fn clear_cart(&self) -> Result<(), ClientError> {
        let response = self.client.delete(self.url("/cart/clear")).send().await?;
        let _: Ack = Self::decode(response).await?;
        Ok(())
    }
}

impl WishlistTransport for HttpTransport {
    async fn fetch_wishlist(&self) -> Result<WishlistBody, ClientError> {
        let response = self.client.get(self.url("/wishlist")).send().await?;
        let body: WishlistResponse = Self::decode(response).await?;
        Ok(body.wishlist)
    }

    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistBody, ClientError> {
        let req = AddWishlistItem {
            product_id: product_id.clone(),
        };
        let response = self
            .client
            .post(self.url("/wishlist/add"))
            .json(&req)
            .send()
            .await?;
        let body: WishlistResponse = Self::decode(response).await?;
        Ok(body.wishlist)
    }

    async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ClientError> {
        let url = self.url(&format!("/wishlist/remove/{}", product_id.as_str()));
        let response = self.client.delete(url).send().await?;
        let _: Ack = Self::decode(response).await?;
        Ok(())
    }
}

impl AuthTransport for HttpTransport {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let response = self.client.post(self.url("/auth/login")).json(req).send().await?;
        Self::decode(response).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<UserBody, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(req)
            .send()
            .await?;
        let body: UserResponse = Self::decode(response).await?;
        Ok(body.user)
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let response = self.client.post(self.url("/auth/logout")).send().await?;
        let _: Ack = Self::decode(response).await?;
        Ok(())
    }

    async fn me(&self) -> Result<UserBody, ClientError> {
        let response = self.client.get(self.url("/auth/me")).send().await?;
        let body: UserResponse = Self::decode(response).await?;
        Ok(body.user)
    }
}

impl CheckoutTransport for HttpTransport {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/checkout/order"))
            .json(req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn verify_order(&self, req: &VerifyOrderRequest) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/checkout/verify"))
            .json(req)
            .send()
            .await?;
        let _: Ack = Self::decode(response).await?;
        Ok(())
    }

    async fn gateway_key(&self) -> Result<String, ClientError> {
        let response = self.client.get(self.url("/checkout/key")).send().await?;
        let body: GatewayKeyResponse = Self::decode(response).await?;
        Ok(body.key_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let transport = HttpTransport::new("http://localhost:3000/").unwrap();
        assert_eq!(transport.url("/cart"), "http://localhost:3000/cart");
    }
}

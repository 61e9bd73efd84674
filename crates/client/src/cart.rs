//! The cart session: a local working copy reconciled with the server.
//!
//! The session runs in one of two modes. As a guest, every mutation is
//! applied locally and persisted to the guest store; the network is never
//! touched. Logged in, mutations are still applied locally first and then
//! pushed to the server best-effort; a failed push is logged and the local
//! state stands.
//!
//! Login is the single reconciliation point: the guest cart is sent with
//! the credentials, the server decides the merge (only an empty server
//! cart accepts the guest items), and the cart in the response becomes the
//! local state. Guest storage is erased after any successful login.

use rust_decimal::Decimal;

use volt_core::api::{AddCartItem, LoginRequest, UpdateCartItem, UserBody};
use volt_core::{Catalog, LineItem, ProductId, cart_total};

use crate::error::ClientError;
use crate::storage::{CART_KEY, GuestStore};
use crate::transport::{AuthTransport, CartTransport};

/// A cart with local-first mutations and server reconciliation.
pub struct CartSession<T: CartTransport, S: GuestStore> {
    transport: T,
    store: S,
    items: Vec<LineItem>,
    authed: bool,
    hydrated: bool,
}

impl<T: CartTransport, S: GuestStore> CartSession<T, S> {
    /// Open a guest session, restoring any persisted guest cart.
    ///
    /// Items referencing products the catalog no longer knows are
    /// dropped; unreadable state starts the session empty.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the guest store fails.
    pub fn new(transport: T, store: S) -> Result<Self, ClientError> {
        let items = load_guest_items(&store)?;
        Ok(Self {
            transport,
            store,
            items,
            authed: false,
            hydrated: false,
        })
    }

    /// Current line items.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of line totals at captured prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        cart_total(&self.items)
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Whether the session is logged in.
    #[must_use]
    pub const fn is_authed(&self) -> bool {
        self.authed
    }

    /// Whether the server cart has been fetched since login.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Fetch the server cart and adopt it. No-op for guests.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the fetch fails; the local state is
    /// left as it was.
    pub async fn hydrate(&mut self) -> Result<(), ClientError> {
        if !self.authed {
            return Ok(());
        }

        let cart = self.transport.fetch_cart().await?;
        self.adopt(cart.products);
        self.hydrated = true;
        Ok(())
    }

    /// Add a product, incrementing the line if it is already present.
    ///
    /// An existing line keeps its captured price; only the quantity
    /// grows.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails. Remote
    /// push failures are logged, not returned.
    pub async fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        price_at_time: Decimal,
    ) -> Result<(), ClientError> {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self
                .items
                .push(LineItem::new(product_id.clone(), quantity, price_at_time)),
        }
        self.normalize();
        self.persist_guest()?;

        if self.authed {
            let req = AddCartItem {
                product_id,
                quantity,
                price_at_time,
            };
            if let Err(e) = self.transport.add_item(&req).await {
                tracing::warn!(error = %e, "cart add push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Set a line's quantity. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails.
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        // A removal, not an update: the remove endpoint tolerates an
        // already-absent line where the update endpoint rejects it.
        if quantity == 0 {
            return self.remove_item(product_id).await;
        }

        if let Some(line) = self.items.iter_mut().find(|i| &i.product_id == product_id) {
            line.quantity = quantity;
        }
        self.normalize();
        self.persist_guest()?;

        if self.authed {
            let req = UpdateCartItem {
                product_id: product_id.clone(),
                quantity,
            };
            if let Err(e) = self.transport.update_item(&req).await {
                tracing::warn!(error = %e, "cart update push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Remove a line. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails.
    pub async fn remove_item(&mut self, product_id: &ProductId) -> Result<(), ClientError> {
        self.items.retain(|i| &i.product_id != product_id);
        self.persist_guest()?;

        if self.authed {
            if let Err(e) = self.transport.remove_item(product_id).await {
                tracing::warn!(error = %e, "cart remove push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest persistence fails.
    pub async fn clear(&mut self) -> Result<(), ClientError> {
        self.items.clear();
        self.persist_guest()?;

        if self.authed {
            if let Err(e) = self.transport.clear_cart().await {
                tracing::warn!(error = %e, "cart clear push failed, keeping local state");
            }
        }
        Ok(())
    }

    /// Log in, sending the guest cart for the server's merge decision.
    ///
    /// On success the cart from the response replaces the local state and
    /// guest storage is erased, whether or not the merge applied. On
    /// failure the guest cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the login fails.
    pub async fn login<A: AuthTransport>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> Result<UserBody, ClientError> {
        let local_cart = if self.items.is_empty() {
            None
        } else {
            Some(self.items.clone())
        };

        let response = auth
            .login(&LoginRequest {
                email: email.to_owned(),
                password: password.to_owned(),
                local_cart,
            })
            .await?;

        self.adopt(response.cart.products);
        self.authed = true;
        self.hydrated = true;
        self.store.remove(CART_KEY)?;

        Ok(response.user)
    }

    /// Log out and reset to an empty guest session.
    ///
    /// The server-side logout is best-effort; the local session resets
    /// either way and the server cart stays persisted for the next login.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if guest storage cannot be cleared.
    pub async fn logout<A: AuthTransport>(&mut self, auth: &A) -> Result<(), ClientError> {
        if let Err(e) = auth.logout().await {
            tracing::warn!(error = %e, "server logout failed, resetting locally");
        }

        self.items.clear();
        self.authed = false;
        self.hydrated = false;
        self.store.remove(CART_KEY)?;
        Ok(())
    }

    /// Drop non-positive quantities.
    fn normalize(&mut self) {
        self.items.retain(|i| i.quantity > 0);
    }

    /// Adopt a server cart as the local state, with the same sanitization
    /// the guest load applies: non-positive quantities and
    /// catalog-unknown products are dropped from the in-memory view.
    fn adopt(&mut self, items: Vec<LineItem>) {
        self.items = items;
        self.items
            .retain(|i| i.quantity > 0 && Catalog::get(&i.product_id).is_some());
    }

    /// Persist the working copy for guests. Logged-in sessions own no
    /// guest state.
    fn persist_guest(&self) -> Result<(), ClientError> {
        if self.authed {
            return Ok(());
        }
        let json = serde_json::to_string(&self.items)?;
        self.store.set(CART_KEY, &json)
    }
}

/// Read and sanitize the persisted guest cart.
fn load_guest_items<S: GuestStore>(store: &S) -> Result<Vec<LineItem>, ClientError> {
    let Some(json) = store.get(CART_KEY)? else {
        return Ok(Vec::new());
    };

    let mut items: Vec<LineItem> = match serde_json::from_str(&json) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "guest cart unreadable, starting empty");
            return Ok(Vec::new());
        }
    };

    items.retain(|i| i.quantity > 0 && Catalog::get(&i.product_id).is_some());
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use volt_core::api::{CartBody, LoginResponse, RegisterRequest};
    use volt_core::{Email, Role, UserId};

    use super::*;
    use crate::storage::MemoryStore;

    /// In-memory stand-in for the storefront, with the same merge gate
    /// the login handler applies.
    #[derive(Default)]
    struct FakeServer {
        cart: Mutex<Vec<LineItem>>,
        fail_writes: bool,
        update_pushes: Mutex<u32>,
    }

    impl FakeServer {
        fn with_cart(items: Vec<LineItem>) -> Self {
            Self {
                cart: Mutex::new(items),
                ..Self::default()
            }
        }

        fn body(&self) -> CartBody {
            let items = self.cart.lock().unwrap().clone();
            CartBody {
                total_price: cart_total(&items),
                products: items,
            }
        }

        fn user() -> UserBody {
            UserBody {
                id: UserId::generate(),
                name: "Test User".to_owned(),
                email: Email::parse("user@example.com").unwrap(),
                role: Role::User,
            }
        }

        fn write_allowed(&self) -> Result<(), ClientError> {
            if self.fail_writes {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".to_owned(),
                });
            }
            Ok(())
        }
    }

    impl CartTransport for &FakeServer {
        async fn fetch_cart(&self) -> Result<CartBody, ClientError> {
            Ok(self.body())
        }

        async fn add_item(&self, req: &AddCartItem) -> Result<CartBody, ClientError> {
            self.write_allowed()?;
            let mut cart = self.cart.lock().unwrap();
            match cart.iter_mut().find(|i| i.product_id == req.product_id) {
                Some(line) => line.quantity += req.quantity,
                None => cart.push(LineItem::new(
                    req.product_id.clone(),
                    req.quantity,
                    req.price_at_time,
                )),
            }
            drop(cart);
            Ok(self.body())
        }

        async fn update_item(&self, req: &UpdateCartItem) -> Result<CartBody, ClientError> {
            self.write_allowed()?;
            *self.update_pushes.lock().unwrap() += 1;
            let mut cart = self.cart.lock().unwrap();
            if let Some(line) = cart.iter_mut().find(|i| i.product_id == req.product_id) {
                line.quantity = req.quantity;
            }
            cart.retain(|i| i.quantity > 0);
            drop(cart);
            Ok(self.body())
        }

        async fn remove_item(&self, product_id: &ProductId) -> Result<CartBody, ClientError> {
            self.write_allowed()?;
            self.cart.lock().unwrap().retain(|i| &i.product_id != product_id);
            Ok(self.body())
        }

        async fn clear_cart(&self) -> Result<(), ClientError> {
            self.write_allowed()?;
            self.cart.lock().unwrap().clear();
            Ok(())
        }
    }

    impl AuthTransport for &FakeServer {
        async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
            if req.password == "wrong" {
                return Err(ClientError::Api {
                    status: 401,
                    message: "Invalid credentials".to_owned(),
                });
            }

            // Server-side merge gate: guest items land only in an empty cart.
            {
                let mut cart = self.cart.lock().unwrap();
                if let Some(ref local) = req.local_cart
                    && cart.is_empty()
                    && !local.is_empty()
                {
                    *cart = local.clone();
                    cart.retain(|i| i.quantity > 0);
                }
            }

            Ok(LoginResponse {
                success: true,
                user: FakeServer::user(),
                cart: self.body(),
            })
        }

        async fn register(&self, _req: &RegisterRequest) -> Result<UserBody, ClientError> {
            Ok(FakeServer::user())
        }

        async fn logout(&self) -> Result<(), ClientError> {
            Ok(())
        }

        async fn me(&self) -> Result<UserBody, ClientError> {
            Ok(FakeServer::user())
        }
    }

    fn line(id: &str, quantity: u32, price: &str) -> LineItem {
        LineItem::new(ProductId::new(id), quantity, price.parse().unwrap())
    }

    #[tokio::test]
    async fn test_guest_add_persists_across_sessions() {
        let server = FakeServer::default();
        let store = MemoryStore::new();

        {
            let mut session = CartSession::new(&server, &store).unwrap();
            session
                .add_item(ProductId::new("3"), 2, "199".parse().unwrap())
                .await
                .unwrap();
        }

        let session = CartSession::new(&server, &store).unwrap();
        assert_eq!(session.total_items(), 2);
        assert_eq!(session.subtotal(), "398".parse::<Decimal>().unwrap());
        // Nothing reached the server.
        assert!(server.cart.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guest_add_increments_and_keeps_captured_price() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("3"), 1, "199".parse().unwrap())
            .await
            .unwrap();
        // Same product at a drifted catalog price: quantity grows, price stays.
        session
            .add_item(ProductId::new("3"), 1, "249".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].quantity, 2);
        assert_eq!(
            session.items()[0].price_at_time,
            "199".parse::<Decimal>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_to_zero_prunes_line() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("8"), 3, "89".parse().unwrap())
            .await
            .unwrap();
        session
            .update_quantity(&ProductId::new("8"), 0)
            .await
            .unwrap();

        assert!(session.items().is_empty());
        assert_eq!(session.subtotal(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_corrupt_guest_storage_starts_empty() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        store.set(CART_KEY, "{not json").unwrap();

        let session = CartSession::new(&server, &store).unwrap();
        assert!(session.items().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_unknown_items_dropped_on_load() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let persisted =
            serde_json::to_string(&vec![line("3", 1, "199"), line("999", 5, "10")]).unwrap();
        store.set(CART_KEY, &persisted).unwrap();

        let session = CartSession::new(&server, &store).unwrap();
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].product_id.as_str(), "3");
    }

    #[tokio::test]
    async fn test_login_merges_into_empty_server_cart() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("5"), 2, "159".parse().unwrap())
            .await
            .unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        assert!(session.is_authed());
        assert_eq!(session.total_items(), 2);
        assert_eq!(server.cart.lock().unwrap().len(), 1);
        // Guest storage erased after the merge decision.
        assert!(store.get(CART_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_server_cart_wins_when_non_empty() {
        let server = FakeServer::with_cart(vec![line("1", 1, "349")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("5"), 2, "159".parse().unwrap())
            .await
            .unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        // No merge: the server cart stands and the guest items are gone.
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].product_id.as_str(), "1");
        assert_eq!(server.cart.lock().unwrap().len(), 1);
        assert!(store.get(CART_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_with_empty_guest_cart_sends_none() {
        let server = FakeServer::with_cart(vec![line("1", 1, "349")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session.login(&&server, "user@example.com", "secret123").await.unwrap();
        assert_eq!(session.items().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_guest_state() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("5"), 2, "159".parse().unwrap())
            .await
            .unwrap();
        let result = session.login(&&server, "user@example.com", "wrong").await;

        assert!(result.is_err());
        assert!(!session.is_authed());
        assert_eq!(session.total_items(), 2);
        assert!(store.get(CART_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_authed_mutation_survives_push_failure() {
        let server = FakeServer {
            fail_writes: true,
            ..FakeServer::default()
        };
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        session
            .add_item(ProductId::new("4"), 1, "179".parse().unwrap())
            .await
            .unwrap();

        // Optimistic: local state kept despite the failed push.
        assert_eq!(session.total_items(), 1);
        assert!(server.cart.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authed_mutations_reach_server() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        session
            .add_item(ProductId::new("4"), 2, "179".parse().unwrap())
            .await
            .unwrap();
        session
            .update_quantity(&ProductId::new("4"), 5)
            .await
            .unwrap();

        let server_cart = server.cart.lock().unwrap();
        assert_eq!(server_cart.len(), 1);
        assert_eq!(server_cart[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_logout_resets_to_empty_guest() {
        let server = FakeServer::with_cart(vec![line("1", 1, "349")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        session.logout(&&server).await.unwrap();

        assert!(!session.is_authed());
        assert!(session.items().is_empty());
        // The server cart is untouched and waits for the next login.
        assert_eq!(server.cart.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hydrate_overwrites_local_state() {
        let server = FakeServer::with_cart(vec![line("2", 1, "299")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        // Drift the server behind the session's back, then hydrate.
        server.cart.lock().unwrap().push(line("6", 1, "599"));
        session.hydrate().await.unwrap();

        assert_eq!(session.items().len(), 2);
        assert_eq!(
            session.subtotal(),
            "898".parse::<Decimal>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_login_drops_catalog_unknown_server_items() {
        let server = FakeServer::with_cart(vec![line("1", 1, "349"), line("999", 2, "10")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        // The delisted product never reaches the in-memory view.
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].product_id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_hydrate_drops_catalog_unknown_items() {
        let server = FakeServer::with_cart(vec![line("2", 1, "299")]);
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        server.cart.lock().unwrap().push(line("999", 2, "10"));
        session.hydrate().await.unwrap();

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].product_id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_zero_quantity_update_pushes_remove_not_update() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();
        session.login(&&server, "user@example.com", "secret123").await.unwrap();

        session
            .add_item(ProductId::new("4"), 2, "179".parse().unwrap())
            .await
            .unwrap();
        session
            .update_quantity(&ProductId::new("4"), 0)
            .await
            .unwrap();

        assert!(session.items().is_empty());
        assert!(server.cart.lock().unwrap().is_empty());
        // The line was removed through the remove endpoint, not a zero update.
        assert_eq!(*server.update_pushes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_subtotal_sums_line_totals() {
        let server = FakeServer::default();
        let store = MemoryStore::new();
        let mut session = CartSession::new(&server, &store).unwrap();

        session
            .add_item(ProductId::new("3"), 2, "15.00".parse().unwrap())
            .await
            .unwrap();
        session
            .add_item(ProductId::new("8"), 1, "15.00".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(session.subtotal(), "45.00".parse::<Decimal>().unwrap());
        assert_eq!(session.total_items(), 3);
    }
}

//! End-to-end reconciliation: the client engine against a live storefront.
//!
//! These tests drive `volt-client` sessions over real HTTP and assert the
//! cross-login semantics the unit tests cover with fakes.
//!
//! Run with: cargo test -p volt-integration-tests -- --include-ignored

use rust_decimal::Decimal;

use volt_client::storage::MemoryStore;
use volt_client::{CartSession, HttpTransport, WishlistSession};
use volt_core::ProductId;
use volt_core::api::RegisterRequest;
use volt_integration_tests::{storefront_base_url, unique_email};

use volt_client::transport::AuthTransport;

/// Register an account through its own transport so the session cookies
/// live on that transport's client.
async fn register_account(transport: &HttpTransport, email: &str) {
    transport
        .register(&RegisterRequest {
            name: "Engine Test".to_owned(),
            email: email.to_owned(),
            password: "secret123".to_owned(),
        })
        .await
        .expect("Failed to register");
    transport.logout().await.expect("Failed to log back out");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_guest_cart_merges_on_first_login() {
    let email = unique_email("engine-merge");
    let transport = HttpTransport::new(storefront_base_url()).unwrap();
    register_account(&transport, &email).await;

    let store = MemoryStore::new();
    let mut session = CartSession::new(transport.clone(), &store).unwrap();

    session
        .add_item(ProductId::new("5"), 2, Decimal::from(159))
        .await
        .unwrap();
    session.login(&transport, &email, "secret123").await.unwrap();

    // Fresh account, empty server cart: the guest items merged.
    assert_eq!(session.total_items(), 2);
    assert_eq!(session.subtotal(), Decimal::from(318));

    // A second session for the same account sees the merged cart.
    let transport2 = HttpTransport::new(storefront_base_url()).unwrap();
    let store2 = MemoryStore::new();
    let mut session2 = CartSession::new(transport2.clone(), &store2).unwrap();
    session2.login(&transport2, &email, "secret123").await.unwrap();
    assert_eq!(session2.total_items(), 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_server_cart_wins_on_relogin() {
    let email = unique_email("engine-wins");
    let transport = HttpTransport::new(storefront_base_url()).unwrap();
    register_account(&transport, &email).await;

    // First login seeds the server cart.
    let store = MemoryStore::new();
    let mut session = CartSession::new(transport.clone(), &store).unwrap();
    session
        .add_item(ProductId::new("1"), 1, Decimal::from(349))
        .await
        .unwrap();
    session.login(&transport, &email, "secret123").await.unwrap();
    session.logout(&transport).await.unwrap();

    // A new guest with different items logs in: server cart stands.
    session
        .add_item(ProductId::new("8"), 3, Decimal::from(89))
        .await
        .unwrap();
    session.login(&transport, &email, "secret123").await.unwrap();

    assert_eq!(session.items().len(), 1);
    assert_eq!(session.items()[0].product_id.as_str(), "1");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wishlist_union_merge_over_http() {
    let email = unique_email("engine-wishlist");
    let transport = HttpTransport::new(storefront_base_url()).unwrap();
    register_account(&transport, &email).await;

    // Seed the server wishlist from a logged-in session.
    let store = MemoryStore::new();
    let mut cart = CartSession::new(transport.clone(), &store).unwrap();
    cart.login(&transport, &email, "secret123").await.unwrap();

    let wishlist_store = MemoryStore::new();
    let mut wishlist = WishlistSession::new(transport.clone(), &wishlist_store).unwrap();
    wishlist.merge_on_login().await.unwrap();
    wishlist.add(ProductId::new("1")).await.unwrap();
    cart.logout(&transport).await.unwrap();

    // Guest saves one overlapping and one new product, then logs in.
    let guest_store = MemoryStore::new();
    let mut guest = WishlistSession::new(transport.clone(), &guest_store).unwrap();
    guest.add(ProductId::new("1")).await.unwrap();
    guest.add(ProductId::new("6")).await.unwrap();

    cart.login(&transport, &email, "secret123").await.unwrap();
    guest.merge_on_login().await.unwrap();

    // Union, no duplicates.
    assert!(guest.contains(&ProductId::new("1")));
    assert!(guest.contains(&ProductId::new("6")));
    assert_eq!(guest.entries().len(), 2);
}

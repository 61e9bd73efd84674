//! Cart repository.
//!
//! Every mutation runs in one transaction that ends by pruning
//! non-positive quantities and recomputing `carts.total_price`, so the
//! total invariant holds for every persisted cart.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use volt_core::{Cart, LineItem, ProductId, UserId, cart_total};

use super::RepositoryError;

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the cart for an account, creating an empty one if the account
    /// has never had a cart (missing carts are self-healing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        ensure_cart(&mut tx, user_id).await?;
        let cart = load_cart(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Add a line or increment an existing line's quantity.
    ///
    /// The captured `price_at_time` of an existing line is left untouched;
    /// only the quantity grows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_or_increment(
        &self,
        user_id: UserId,
        item: &LineItem,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        ensure_cart(&mut tx, user_id).await?;

        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, price_at_time) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(user_id)
        .bind(&item.product_id)
        .bind(int_quantity(item.quantity))
        .bind(item.price_at_time)
        .execute(&mut *tx)
        .await?;

        let cart = settle(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account has no cart or
    /// the product is not in it.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !cart_exists(&mut tx, user_id).await? {
            return Err(RepositoryError::NotFound("cart".to_owned()));
        }

        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(int_quantity(quantity))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("product not found in cart".to_owned()));
        }

        let cart = settle(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Remove a line. Removing a product that is not in the cart is a
    /// no-op; the cart itself must exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account has no cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !cart_exists(&mut tx, user_id).await? {
            return Err(RepositoryError::NotFound("cart".to_owned()));
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let cart = settle(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        ensure_cart(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        settle(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace the cart's items wholesale, as one write.
    ///
    /// This is the merge-on-login write path: the caller has already
    /// decided the merge is allowed, and the guest items land verbatim
    /// (their captured prices included).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn replace_items(
        &self,
        user_id: UserId,
        items: &[LineItem],
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        ensure_cart(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for item in items.iter().filter(|i| i.quantity > 0) {
            sqlx::query(
                "INSERT INTO cart_items (user_id, product_id, quantity, price_at_time) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (user_id, product_id) \
                 DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
            )
            .bind(user_id)
            .bind(&item.product_id)
            .bind(int_quantity(item.quantity))
            .bind(item.price_at_time)
            .execute(&mut *tx)
            .await?;
        }

        let cart = settle(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }
}

/// Clamp a wire quantity into the column type.
fn int_quantity(quantity: u32) -> i32 {
    i32::try_from(quantity).unwrap_or(i32::MAX)
}

async fn cart_exists(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<bool, RepositoryError> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(exists.is_some())
}

async fn ensure_cart(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<(), RepositoryError> {
    sqlx::query("INSERT INTO carts (user_id, total_price) VALUES ($1, 0) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Prune non-positive quantities, recompute the stored total, and return
/// the cart as persisted.
async fn settle(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<Cart, RepositoryError> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND quantity <= 0")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    let cart = load_cart(tx, user_id).await?;

    sqlx::query("UPDATE carts SET total_price = $2, updated_at = now() WHERE user_id = $1")
        .bind(user_id)
        .bind(cart.total_price)
        .execute(&mut **tx)
        .await?;

    Ok(cart)
}

async fn load_cart(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<Cart, RepositoryError> {
    let rows: Vec<(ProductId, i32, Decimal)> = sqlx::query_as(
        "SELECT product_id, quantity, price_at_time FROM cart_items \
         WHERE user_id = $1 ORDER BY added_at",
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;

    let items: Vec<LineItem> = rows
        .into_iter()
        .map(|(product_id, quantity, price_at_time)| LineItem {
            product_id,
            quantity: u32::try_from(quantity).unwrap_or(0),
            price_at_time,
        })
        .collect();

    let total_price = cart_total(&items);

    Ok(Cart {
        user_id,
        items,
        total_price,
    })
}

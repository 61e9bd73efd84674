//! Wishlist repository.
//!
//! A wishlist is a set of product references with timestamps. Adding a
//! product that is already saved is a no-op, which is what makes the
//! client-side union merge idempotent.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use volt_core::{ProductId, UserId, Wishlist, WishlistEntry};

use super::RepositoryError;

/// Repository for wishlist operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the wishlist for an account. Accounts with no saved items
    /// get an empty wishlist; there is no separate creation step.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Wishlist, RepositoryError> {
        let rows: Vec<(ProductId, DateTime<Utc>)> = sqlx::query_as(
            "SELECT product_id, added_at FROM wishlist_items \
             WHERE user_id = $1 ORDER BY added_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Wishlist {
            user_id,
            entries: rows
                .into_iter()
                .map(|(product_id, added_at)| WishlistEntry {
                    product_id,
                    added_at,
                })
                .collect(),
        })
    }

    /// Save a product, keeping the original timestamp if it is already
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist, RepositoryError> {
        sqlx::query(
            "INSERT INTO wishlist_items (user_id, product_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        self.get(user_id).await
    }

    /// Remove a saved product. Removing a product that is not saved is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist, RepositoryError> {
        sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        self.get(user_id).await
    }
}

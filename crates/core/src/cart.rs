//! Cart and wishlist domain types.
//!
//! The cart invariant lives here: `total_price` is always the sum of
//! `price_at_time * quantity` over the current items, and items with a
//! non-positive quantity are pruned before they are ever persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UserId};

/// One line in a cart.
///
/// `price_at_time` is the unit price captured at the moment the item was
/// added. It is never re-read from the catalog afterwards, so the line
/// total stays stable even if catalog prices change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog identifier of the product.
    pub product_id: ProductId,
    /// Units of the product; always >= 1 once persisted.
    pub quantity: u32,
    /// Unit price captured at add time. Immutable thereafter.
    pub price_at_time: Decimal,
}

impl LineItem {
    /// Create a line item with the price captured now.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32, price_at_time: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            price_at_time,
        }
    }

    /// Line total (`price_at_time * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_at_time * Decimal::from(self.quantity)
    }
}

/// A server-persisted cart, exclusively owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Owning account.
    pub user_id: UserId,
    /// Line items, unique by product ID.
    pub items: Vec<LineItem>,
    /// Always equal to the sum of line totals. Recomputed before every
    /// persist, never trusted from input.
    pub total_price: Decimal,
}

impl Cart {
    /// An empty cart for the given account.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total_price: Decimal::ZERO,
        }
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop non-positive quantities and restore the total invariant.
    pub fn normalize(&mut self) {
        self.items.retain(|item| item.quantity > 0);
        self.total_price = cart_total(&self.items);
    }
}

/// Sum of line totals over items with a positive quantity.
#[must_use]
pub fn cart_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .filter(|item| item.quantity > 0)
        .map(LineItem::line_total)
        .sum()
}

/// One entry in a wishlist. No quantity, no price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Catalog identifier of the product.
    pub product_id: ProductId,
    /// When the product was wished for.
    pub added_at: DateTime<Utc>,
}

/// A server-persisted wishlist, exclusively owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    /// Owning account.
    pub user_id: UserId,
    /// Entries, unique by product ID.
    pub entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// An empty wishlist for the given account.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            entries: Vec::new(),
        }
    }

    /// Whether the given product is already wished for.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product_id == product_id)
    }
}

//! The static product catalog.
//!
//! The catalog is a small, fixed lookup table. It is used only to hydrate
//! line items with display data; the authoritative unit price for a cart
//! line is captured separately at add time (see [`crate::cart::LineItem`]).

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product as known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current catalog price. May drift from `price_at_time` on cart lines.
    pub price: Decimal,
    /// Category label, e.g. "Audio".
    pub category: String,
    /// Image path for display.
    pub image: String,
    /// Marketing copy.
    pub description: String,
    /// Whether the product is featured on the home page.
    pub featured: bool,
}

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    let entry = |id: &str,
                 name: &str,
                 price: u32,
                 category: &str,
                 image: &str,
                 description: &str,
                 featured: bool| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Decimal::from(price),
        category: category.to_owned(),
        image: image.to_owned(),
        description: description.to_owned(),
        featured,
    };

    vec![
        entry(
            "1",
            "Aura Pro Headphones",
            349,
            "Audio",
            "/images/headphones.jpg",
            "Premium wireless over-ear headphones with active noise cancellation, \
             40-hour battery life, and studio-grade sound quality.",
            true,
        ),
        entry(
            "2",
            "Pulse Smartwatch",
            299,
            "Wearables",
            "/images/smartwatch.jpg",
            "Advanced health tracking smartwatch with AMOLED display, GPS, \
             heart rate monitor, and 7-day battery life.",
            true,
        ),
        entry(
            "3",
            "Echo Speaker",
            199,
            "Audio",
            "/images/speaker.jpg",
            "Portable Bluetooth speaker with 360-degree immersive sound, \
             waterproof design, and 20-hour playtime.",
            true,
        ),
        entry(
            "4",
            "Apex Keyboard",
            179,
            "Accessories",
            "/images/keyboard.jpg",
            "Compact wireless mechanical keyboard with tactile switches, \
             customizable RGB backlighting, and aluminum frame.",
            false,
        ),
        entry(
            "5",
            "Nova Earbuds",
            159,
            "Audio",
            "/images/earbuds.jpg",
            "True wireless earbuds with hybrid noise cancellation, transparency \
             mode, and 30-hour total battery life.",
            false,
        ),
        entry(
            "6",
            "Slate Tablet",
            599,
            "Devices",
            "/images/tablet.jpg",
            "Ultra-thin tablet with 11-inch Retina display, powerful processor, \
             and all-day battery for work and entertainment.",
            true,
        ),
        entry(
            "7",
            "Lens Compact Camera",
            899,
            "Devices",
            "/images/camera.jpg",
            "Mirrorless compact camera with 26MP sensor, 4K video recording, \
             and advanced autofocus system.",
            false,
        ),
        entry(
            "8",
            "Drift Wireless Mouse",
            89,
            "Accessories",
            "/images/mouse.jpg",
            "Ergonomic wireless mouse with precision tracking, silent clicks, \
             and 6-month battery life on a single charge.",
            false,
        ),
    ]
});

/// Read-only access to the product table.
pub struct Catalog;

impl Catalog {
    /// All products.
    #[must_use]
    pub fn all() -> &'static [Product] {
        &PRODUCTS
    }

    /// Look up one product by ID.
    #[must_use]
    pub fn get(id: &ProductId) -> Option<&'static Product> {
        PRODUCTS.iter().find(|p| &p.id == id)
    }

    /// Products marked as featured.
    #[must_use]
    pub fn featured() -> Vec<&'static Product> {
        PRODUCTS.iter().filter(|p| p.featured).collect()
    }

    /// Distinct category labels, in first-seen order.
    #[must_use]
    pub fn categories() -> Vec<&'static str> {
        let mut seen = Vec::new();
        for product in PRODUCTS.iter() {
            if !seen.contains(&product.category.as_str()) {
                seen.push(product.category.as_str());
            }
        }
        seen
    }
}

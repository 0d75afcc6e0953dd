//! Product domain types.

use serde::{Deserialize, Serialize};

use buy_recipes_core::ProductId;

/// A purchasable product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price in integer cents.
    pub price_in_cents: i64,
    /// Optimistic-lock version of the persisted row.
    pub version: i64,
}

/// Product as returned by the REST surface, and as embedded in cart views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price_in_cents: i64,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price_in_cents: product.price_in_cents,
        }
    }
}

//! Shopping cart domain types.

use serde::{Deserialize, Serialize};

use buy_recipes_core::{CartId, CartItemId, ProductId};

use crate::models::product::ProductView;

/// A shopping cart (domain type).
///
/// `total_in_cents` is denormalized: after every successful mutation it
/// equals the sum of the current prices of the products referenced by the
/// cart's items. The `version` is the optimistic-concurrency fence for all
/// writes to this row.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Cached total of the cart contents, in integer cents.
    pub total_in_cents: i64,
    /// Optimistic-lock version of the persisted row.
    pub version: i64,
}

/// One unit-membership row linking a cart to a product.
///
/// No quantity field: each unit is a separate row, priced individually via
/// its product's current price.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique item row ID.
    pub id: CartItemId,
    /// Owning cart.
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
}

/// Cart as returned by the REST surface, with items resolved to their
/// products at read time. An item whose product has since been deleted is
/// dropped from the list.
///
/// Unlike the other views, the cart exposes its `version`: carts are the
/// rows mutated under concurrent load, and a client may pass the version
/// back on `PUT /carts/{id}` as its write fence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub total_in_cents: i64,
    pub version: i64,
    pub items: Vec<ProductView>,
}

//! Recipe domain types.

use serde::{Deserialize, Serialize};

use buy_recipes_core::{ProductId, RecipeId};

/// A recipe header (domain type). Ingredient rows are associated by
/// foreign key, not physically contained.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Unique recipe ID.
    pub id: RecipeId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Optimistic-lock version of the persisted row.
    pub version: i64,
}

/// One resolved ingredient line in a recipe view: the referenced product
/// plus the declared quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineItem {
    pub id: ProductId,
    pub name: String,
    pub price_in_cents: i64,
    pub quantity: i64,
}

/// Recipe as returned by the REST surface, with ingredients resolved to
/// their products at read time. An ingredient whose product has since been
/// deleted is dropped from the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: RecipeId,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeLineItem>,
}

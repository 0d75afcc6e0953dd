//! Recipe ingredient domain types.

use serde::{Deserialize, Serialize};

use buy_recipes_core::{ProductId, RecipeId, RecipeIngredientId};

/// An association row linking exactly one recipe to one product
/// (domain type). Multiple rows may share a recipe or a product.
#[derive(Debug, Clone)]
pub struct RecipeIngredient {
    /// Unique ingredient row ID.
    pub id: RecipeIngredientId,
    /// Owning recipe.
    pub recipe_id: RecipeId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Declared quantity (defaults to 1 at the boundary).
    pub quantity: i64,
    /// Declared unit (defaults to "" at the boundary).
    pub unit: String,
    /// Optimistic-lock version of the persisted row.
    pub version: i64,
}

/// Ingredient as returned by the REST surface, with the product name
/// resolved at read time ("" when the product has been deleted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientView {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit: String,
}

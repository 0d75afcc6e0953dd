//! Cart handlers: thin adapters over the cart engine.
//!
//! The engine reports missing carts/products/recipes as `None`; handlers
//! translate that into 404 responses. Version conflicts surface as 409 via
//! the error mapping and are expected to be retried by the caller.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use buy_recipes_core::{CartId, ProductId, RecipeId};

use crate::error::AppError;
use crate::models::CartView;
use crate::services::CartService;
use crate::state::AppState;

/// Request to create a cart. A missing total defaults to 0.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub total_in_cents: Option<i64>,
}

/// Request to overwrite a cart's total. A missing total defaults to 0.
///
/// `version` is optional: when present it is the version the client last
/// read (carried on cart responses) and the write fails with 409 if the
/// cart has moved on since; when absent the write is fenced against a
/// fresh read inside the update transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub total_in_cents: Option<i64>,
    pub version: Option<i64>,
}

/// Body for POST /carts/{id}/add_product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub product_id: Option<i64>,
}

/// Body for POST /carts/{id}/add_recipe.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeRequest {
    pub recipe_id: Option<i64>,
}

fn validate_total(total_in_cents: Option<i64>) -> Result<i64, AppError> {
    let total = total_in_cents.unwrap_or(0);
    if total < 0 {
        return Err(AppError::BadRequest(
            "totalInCents must be non-negative".into(),
        ));
    }
    Ok(total)
}

/// GET /carts
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CartView>>, AppError> {
    let carts = CartService::new(state.pool()).list().await?;
    Ok(Json(carts))
}

/// GET /carts/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let cart = CartService::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} not found")))?;
    Ok(Json(cart))
}

/// POST /carts
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCartRequest>,
) -> Result<Json<CartView>, AppError> {
    let total = validate_total(request.total_in_cents)?;
    let cart = CartService::new(state.pool()).create(total).await?;
    Ok(Json(cart))
}

/// PUT /carts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let total = validate_total(request.total_in_cents)?;
    let cart = CartService::new(state.pool())
        .update_total(id, total, request.version)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} not found")))?;
    Ok(Json(cart))
}

/// DELETE /carts/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = CartId::new(id);
    if CartService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound(format!("cart {id} not found")))
    }
}

/// POST /carts/{id}/add_product
pub async fn add_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddProductRequest>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let product_id = request
        .product_id
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("productId is required".into()))?;

    let cart = CartService::new(state.pool())
        .add_product(id, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} or product {product_id} not found")))?;
    Ok(Json(cart))
}

/// DELETE /carts/{id}/products/{productId}
pub async fn remove_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i64, i64)>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let cart = CartService::new(state.pool())
        .remove_product(id, ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} not found")))?;
    Ok(Json(cart))
}

/// POST /carts/{id}/add_recipe
pub async fn add_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddRecipeRequest>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let recipe_id = request
        .recipe_id
        .map(RecipeId::new)
        .ok_or_else(|| AppError::BadRequest("recipeId is required".into()))?;

    let cart = CartService::new(state.pool())
        .add_recipe(id, recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} or recipe {recipe_id} not found")))?;
    Ok(Json(cart))
}

/// DELETE /carts/{id}/recipes/{recipeId}
pub async fn remove_recipe(
    State(state): State<AppState>,
    Path((id, recipe_id)): Path<(i64, i64)>,
) -> Result<Json<CartView>, AppError> {
    let id = CartId::new(id);
    let cart = CartService::new(state.pool())
        .remove_recipe(id, RecipeId::new(recipe_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id} not found")))?;
    Ok(Json(cart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_defaults_to_zero() {
        assert_eq!(validate_total(None).unwrap(), 0);
        assert_eq!(validate_total(Some(1299)).unwrap(), 1299);
    }

    #[test]
    fn total_rejects_negative() {
        assert!(validate_total(Some(-1)).is_err());
    }
}

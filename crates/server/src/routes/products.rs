//! Product CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use buy_recipes_core::ProductId;

use crate::db;
use crate::error::AppError;
use crate::models::ProductView;
use crate::state::AppState;

/// Request to create a product. `name` is required; a missing price
/// defaults to 0 cents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price_in_cents: Option<i64>,
}

/// Request to update a product. Same field rules as creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price_in_cents: Option<i64>,
}

fn validate(
    name: Option<String>,
    price_in_cents: Option<i64>,
) -> Result<(String, i64), AppError> {
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let price_in_cents = price_in_cents.unwrap_or(0);
    if price_in_cents < 0 {
        return Err(AppError::BadRequest(
            "priceInCents must be non-negative".into(),
        ));
    }
    Ok((name, price_in_cents))
}

/// GET /products
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>, AppError> {
    let mut conn = state.pool().acquire().await?;
    let products = db::products::find_all(&mut conn).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>, AppError> {
    let id = ProductId::new(id);
    let mut conn = state.pool().acquire().await?;
    let product = db::products::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;
    Ok(Json(product.into()))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ProductView>, AppError> {
    let (name, price_in_cents) = validate(request.name, request.price_in_cents)?;
    let mut conn = state.pool().acquire().await?;
    let product = db::products::insert(&mut conn, &name, price_in_cents).await?;
    Ok(Json(product.into()))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductView>, AppError> {
    let id = ProductId::new(id);
    let (name, price_in_cents) = validate(request.name, request.price_in_cents)?;

    let mut tx = state.pool().begin().await?;
    let existing = db::products::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;
    let updated = db::products::update(&mut tx, id, &name, price_in_cents, existing.version)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;
    tx.commit().await?;

    Ok(Json(updated.into()))
}

/// DELETE /products/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = ProductId::new(id);
    let mut conn = state.pool().acquire().await?;
    if db::products::delete(&mut conn, id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound(format!("product {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name() {
        assert!(validate(None, Some(100)).is_err());
        assert!(validate(Some(String::new()), Some(100)).is_err());
    }

    #[test]
    fn validate_defaults_price_to_zero() {
        let (name, price) = validate(Some("Flour".into()), None).unwrap();
        assert_eq!(name, "Flour");
        assert_eq!(price, 0);
    }

    #[test]
    fn validate_rejects_negative_price() {
        assert!(validate(Some("Flour".into()), Some(-1)).is_err());
    }
}

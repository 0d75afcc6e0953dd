//! Recipe ingredient CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use sqlx::SqliteConnection;

use buy_recipes_core::{ProductId, RecipeId, RecipeIngredientId};

use crate::db::{self, RepositoryError};
use crate::error::AppError;
use crate::models::{RecipeIngredient, RecipeIngredientView};
use crate::state::AppState;

/// Request to create or update an ingredient row. `recipeId` and
/// `productId` are required; quantity defaults to 1 and unit to "".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    pub recipe_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
}

/// Validated ingredient fields with boundary defaults applied.
struct IngredientFields {
    recipe_id: RecipeId,
    product_id: ProductId,
    quantity: i64,
    unit: String,
}

fn validate(request: IngredientRequest) -> Result<IngredientFields, AppError> {
    let recipe_id = request
        .recipe_id
        .map(RecipeId::new)
        .ok_or_else(|| AppError::BadRequest("recipeId is required".into()))?;
    let product_id = request
        .product_id
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("productId is required".into()))?;
    let quantity = request.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be positive".into()));
    }
    Ok(IngredientFields {
        recipe_id,
        product_id,
        quantity,
        unit: request.unit.unwrap_or_default(),
    })
}

/// Check that the referenced recipe and product exist.
async fn check_references(
    conn: &mut SqliteConnection,
    fields: &IngredientFields,
) -> Result<(), AppError> {
    if db::recipes::find_by_id(conn, fields.recipe_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "recipe {} not found",
            fields.recipe_id
        )));
    }
    if db::products::find_by_id(conn, fields.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "product {} not found",
            fields.product_id
        )));
    }
    Ok(())
}

async fn view(
    conn: &mut SqliteConnection,
    ingredient: RecipeIngredient,
) -> Result<RecipeIngredientView, RepositoryError> {
    let product_name = db::products::find_by_id(conn, ingredient.product_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();
    Ok(RecipeIngredientView {
        id: ingredient.id,
        recipe_id: ingredient.recipe_id,
        product_id: ingredient.product_id,
        product_name,
        quantity: ingredient.quantity,
        unit: ingredient.unit,
    })
}

async fn views(
    conn: &mut SqliteConnection,
    ingredients: Vec<RecipeIngredient>,
) -> Result<Vec<RecipeIngredientView>, RepositoryError> {
    let mut out = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        out.push(view(conn, ingredient).await?);
    }
    Ok(out)
}

/// GET /recipe-ingredients
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeIngredientView>>, AppError> {
    let mut conn = state.pool().acquire().await?;
    let ingredients = db::recipe_ingredients::find_all(&mut conn).await?;
    Ok(Json(views(&mut conn, ingredients).await?))
}

/// GET /recipe-ingredients/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeIngredientView>, AppError> {
    let id = RecipeIngredientId::new(id);
    let mut conn = state.pool().acquire().await?;
    let ingredient = db::recipe_ingredients::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe ingredient {id} not found")))?;
    Ok(Json(view(&mut conn, ingredient).await?))
}

/// GET /recipe-ingredients/recipe/{recipeId}
pub async fn by_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Vec<RecipeIngredientView>>, AppError> {
    let mut conn = state.pool().acquire().await?;
    let ingredients =
        db::recipe_ingredients::find_by_recipe_id(&mut conn, RecipeId::new(recipe_id)).await?;
    Ok(Json(views(&mut conn, ingredients).await?))
}

/// GET /recipe-ingredients/product/{productId}
pub async fn by_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<RecipeIngredientView>>, AppError> {
    let mut conn = state.pool().acquire().await?;
    let ingredients =
        db::recipe_ingredients::find_by_product_id(&mut conn, ProductId::new(product_id)).await?;
    Ok(Json(views(&mut conn, ingredients).await?))
}

/// POST /recipe-ingredients
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<IngredientRequest>,
) -> Result<Json<RecipeIngredientView>, AppError> {
    let fields = validate(request)?;
    let mut conn = state.pool().acquire().await?;
    check_references(&mut conn, &fields).await?;

    let ingredient = db::recipe_ingredients::insert(
        &mut conn,
        fields.recipe_id,
        fields.product_id,
        fields.quantity,
        &fields.unit,
    )
    .await?;
    Ok(Json(view(&mut conn, ingredient).await?))
}

/// PUT /recipe-ingredients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<IngredientRequest>,
) -> Result<Json<RecipeIngredientView>, AppError> {
    let id = RecipeIngredientId::new(id);
    let fields = validate(request)?;

    let mut tx = state.pool().begin().await?;
    let existing = db::recipe_ingredients::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe ingredient {id} not found")))?;
    check_references(&mut tx, &fields).await?;

    let updated = db::recipe_ingredients::update(
        &mut tx,
        id,
        fields.recipe_id,
        fields.product_id,
        fields.quantity,
        &fields.unit,
        existing.version,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("recipe ingredient {id} not found")))?;
    let view = view(&mut tx, updated).await?;
    tx.commit().await?;

    Ok(Json(view))
}

/// DELETE /recipe-ingredients/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = RecipeIngredientId::new(id);
    let mut conn = state.pool().acquire().await?;
    if db::recipe_ingredients::delete(&mut conn, id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound(format!(
            "recipe ingredient {id} not found"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        recipe_id: Option<i64>,
        product_id: Option<i64>,
        quantity: Option<i64>,
        unit: Option<String>,
    ) -> IngredientRequest {
        IngredientRequest {
            recipe_id,
            product_id,
            quantity,
            unit,
        }
    }

    #[test]
    fn validate_requires_both_references() {
        assert!(validate(request(None, Some(1), None, None)).is_err());
        assert!(validate(request(Some(1), None, None, None)).is_err());
    }

    #[test]
    fn validate_applies_defaults() {
        let fields = validate(request(Some(1), Some(2), None, None)).unwrap();
        assert_eq!(fields.quantity, 1);
        assert_eq!(fields.unit, "");
    }

    #[test]
    fn validate_rejects_non_positive_quantity() {
        assert!(validate(request(Some(1), Some(2), Some(0), None)).is_err());
        assert!(validate(request(Some(1), Some(2), Some(-3), None)).is_err());
    }
}

//! Recipe CRUD handlers.
//!
//! Recipe views embed their ingredients resolved to products at read time.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use sqlx::SqliteConnection;

use buy_recipes_core::RecipeId;

use crate::db::{self, RepositoryError};
use crate::error::AppError;
use crate::models::{Recipe, RecipeView};
use crate::state::AppState;

/// Request to create a recipe. `name` is required; a missing description
/// defaults to "".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request to update a recipe. Same field rules as creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn validate(
    name: Option<String>,
    description: Option<String>,
) -> Result<(String, String), AppError> {
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    Ok((name, description.unwrap_or_default()))
}

async fn view(conn: &mut SqliteConnection, recipe: Recipe) -> Result<RecipeView, RepositoryError> {
    let ingredients = db::recipes::line_items(conn, recipe.id).await?;
    Ok(RecipeView {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        ingredients,
    })
}

/// GET /recipes
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<RecipeView>>, AppError> {
    let mut conn = state.pool().acquire().await?;
    let recipes = db::recipes::find_all(&mut conn).await?;

    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        views.push(view(&mut conn, recipe).await?);
    }
    Ok(Json(views))
}

/// GET /recipes/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeView>, AppError> {
    let id = RecipeId::new(id);
    let mut conn = state.pool().acquire().await?;
    let recipe = db::recipes::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id} not found")))?;
    Ok(Json(view(&mut conn, recipe).await?))
}

/// POST /recipes
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<Json<RecipeView>, AppError> {
    let (name, description) = validate(request.name, request.description)?;
    let mut conn = state.pool().acquire().await?;
    let recipe = db::recipes::insert(&mut conn, &name, &description).await?;
    Ok(Json(view(&mut conn, recipe).await?))
}

/// PUT /recipes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeView>, AppError> {
    let id = RecipeId::new(id);
    let (name, description) = validate(request.name, request.description)?;

    let mut tx = state.pool().begin().await?;
    let existing = db::recipes::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id} not found")))?;
    let updated = db::recipes::update(&mut tx, id, &name, &description, existing.version)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id} not found")))?;
    let view = view(&mut tx, updated).await?;
    tx.commit().await?;

    Ok(Json(view))
}

/// DELETE /recipes/{id} - cascades the recipe's ingredient rows.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = RecipeId::new(id);
    let mut tx = state.pool().begin().await?;
    if db::recipes::find_by_id(&mut tx, id).await?.is_none() {
        return Err(AppError::NotFound(format!("recipe {id} not found")));
    }
    db::recipe_ingredients::delete_by_recipe_id(&mut tx, id).await?;
    db::recipes::delete(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name() {
        assert!(validate(None, None).is_err());
    }

    #[test]
    fn validate_defaults_description() {
        let (name, description) = validate(Some("Pancakes".into()), None).unwrap();
        assert_eq!(name, "Pancakes");
        assert_eq!(description, "");
    }
}

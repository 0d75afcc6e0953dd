//! Recipe ingredient repository.

use sqlx::SqliteConnection;

use buy_recipes_core::{ProductId, RecipeId, RecipeIngredientId};

use super::RepositoryError;
use crate::models::RecipeIngredient;

const COLUMNS: &str = "id, recipe_id, product_id, quantity, unit, version";

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: i64,
    recipe_id: i64,
    product_id: i64,
    quantity: i64,
    unit: String,
    version: i64,
}

impl From<IngredientRow> for RecipeIngredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: RecipeIngredientId::new(row.id),
            recipe_id: RecipeId::new(row.recipe_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit: row.unit,
            version: row.version,
        }
    }
}

/// List all ingredient rows, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_all(
    conn: &mut SqliteConnection,
) -> Result<Vec<RecipeIngredient>, RepositoryError> {
    let rows = sqlx::query_as::<_, IngredientRow>(&format!(
        "SELECT {COLUMNS} FROM recipe_ingredients ORDER BY id"
    ))
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Get an ingredient row by its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: RecipeIngredientId,
) -> Result<Option<RecipeIngredient>, RepositoryError> {
    let row = sqlx::query_as::<_, IngredientRow>(&format!(
        "SELECT {COLUMNS} FROM recipe_ingredients WHERE id = ?"
    ))
    .bind(id.as_i64())
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

/// List the ingredient rows belonging to a recipe, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_recipe_id(
    conn: &mut SqliteConnection,
    recipe_id: RecipeId,
) -> Result<Vec<RecipeIngredient>, RepositoryError> {
    let rows = sqlx::query_as::<_, IngredientRow>(&format!(
        "SELECT {COLUMNS} FROM recipe_ingredients WHERE recipe_id = ? ORDER BY id"
    ))
    .bind(recipe_id.as_i64())
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// List the ingredient rows referencing a product, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_product_id(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> Result<Vec<RecipeIngredient>, RepositoryError> {
    let rows = sqlx::query_as::<_, IngredientRow>(&format!(
        "SELECT {COLUMNS} FROM recipe_ingredients WHERE product_id = ? ORDER BY id"
    ))
    .bind(product_id.as_i64())
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Insert a new ingredient row and return the persisted row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    recipe_id: RecipeId,
    product_id: ProductId,
    quantity: i64,
    unit: &str,
) -> Result<RecipeIngredient, RepositoryError> {
    let row = sqlx::query_as::<_, IngredientRow>(&format!(
        "INSERT INTO recipe_ingredients (recipe_id, product_id, quantity, unit) \
         VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(recipe_id.as_i64())
    .bind(product_id.as_i64())
    .bind(quantity)
    .bind(unit)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Update an ingredient row under its version fence.
///
/// Returns `Ok(None)` if the row no longer exists.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the persisted version no longer
/// matches `expected_version`, and `RepositoryError::Database` if the query
/// fails.
pub async fn update(
    conn: &mut SqliteConnection,
    id: RecipeIngredientId,
    recipe_id: RecipeId,
    product_id: ProductId,
    quantity: i64,
    unit: &str,
    expected_version: i64,
) -> Result<Option<RecipeIngredient>, RepositoryError> {
    let row = sqlx::query_as::<_, IngredientRow>(&format!(
        "UPDATE recipe_ingredients \
         SET recipe_id = ?, product_id = ?, quantity = ?, unit = ?, version = version + 1 \
         WHERE id = ? AND version = ? RETURNING {COLUMNS}"
    ))
    .bind(recipe_id.as_i64())
    .bind(product_id.as_i64())
    .bind(quantity)
    .bind(unit)
    .bind(id.as_i64())
    .bind(expected_version)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(row.into())),
        None => match find_by_id(conn, id).await? {
            Some(_) => Err(RepositoryError::Conflict(format!(
                "stale version for recipe ingredient {id}"
            ))),
            None => Ok(None),
        },
    }
}

/// Delete an ingredient row. Returns `false` if no row matched.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(
    conn: &mut SqliteConnection,
    id: RecipeIngredientId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM recipe_ingredients WHERE id = ?")
        .bind(id.as_i64())
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all ingredient rows belonging to a recipe.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_by_recipe_id(
    conn: &mut SqliteConnection,
    recipe_id: RecipeId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

//! Recipe repository.

use sqlx::SqliteConnection;

use buy_recipes_core::RecipeId;

use super::RepositoryError;
use crate::models::{Recipe, RecipeLineItem};

#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    description: String,
    version: i64,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            name: row.name,
            description: row.description,
            version: row.version,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    name: String,
    price_in_cents: i64,
    quantity: i64,
}

/// List all recipes, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Recipe>, RepositoryError> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, name, description, version FROM recipes ORDER BY id",
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Get a recipe by its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: RecipeId,
) -> Result<Option<Recipe>, RepositoryError> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, name, description, version FROM recipes WHERE id = ?",
    )
    .bind(id.as_i64())
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

/// Resolve a recipe's ingredient rows to product line items at read time.
/// Ingredients whose product has been deleted are dropped by the join.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn line_items(
    conn: &mut SqliteConnection,
    id: RecipeId,
) -> Result<Vec<RecipeLineItem>, RepositoryError> {
    let rows = sqlx::query_as::<_, LineItemRow>(
        "SELECT p.id, p.name, p.price_in_cents, ri.quantity \
         FROM recipe_ingredients ri \
         JOIN products p ON p.id = ri.product_id \
         WHERE ri.recipe_id = ? \
         ORDER BY ri.id",
    )
    .bind(id.as_i64())
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RecipeLineItem {
            id: buy_recipes_core::ProductId::new(row.id),
            name: row.name,
            price_in_cents: row.price_in_cents,
            quantity: row.quantity,
        })
        .collect())
}

/// Insert a new recipe and return the persisted row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    description: &str,
) -> Result<Recipe, RepositoryError> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "INSERT INTO recipes (name, description) VALUES (?, ?) \
         RETURNING id, name, description, version",
    )
    .bind(name)
    .bind(description)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Update a recipe under its version fence.
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
    id: RecipeId,
    name: &str,
    description: &str,
    expected_version: i64,
) -> Result<Option<Recipe>, RepositoryError> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "UPDATE recipes SET name = ?, description = ?, version = version + 1 \
         WHERE id = ? AND version = ? \
         RETURNING id, name, description, version",
    )
    .bind(name)
    .bind(description)
    .bind(id.as_i64())
    .bind(expected_version)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(row.into())),
        None => match find_by_id(conn, id).await? {
            Some(_) => Err(RepositoryError::Conflict(format!(
                "stale version for recipe {id}"
            ))),
            None => Ok(None),
        },
    }
}

/// Delete a recipe. Returns `false` if no row matched.
///
/// Ingredient rows are cascaded by the caller inside the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(conn: &mut SqliteConnection, id: RecipeId) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id.as_i64())
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

//! Product repository.

use sqlx::SqliteConnection;

use buy_recipes_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_in_cents: i64,
    version: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price_in_cents: row.price_in_cents,
            version: row.version,
        }
    }
}

/// List all products, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price_in_cents, version FROM products ORDER BY id",
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Get a product by its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price_in_cents, version FROM products WHERE id = ?",
    )
    .bind(id.as_i64())
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

/// Insert a new product and return the persisted row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    price_in_cents: i64,
) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "INSERT INTO products (name, price_in_cents) VALUES (?, ?) \
         RETURNING id, name, price_in_cents, version",
    )
    .bind(name)
    .bind(price_in_cents)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Update a product under its version fence.
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
    id: ProductId,
    name: &str,
    price_in_cents: i64,
    expected_version: i64,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "UPDATE products SET name = ?, price_in_cents = ?, version = version + 1 \
         WHERE id = ? AND version = ? \
         RETURNING id, name, price_in_cents, version",
    )
    .bind(name)
    .bind(price_in_cents)
    .bind(id.as_i64())
    .bind(expected_version)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(row.into())),
        None => match find_by_id(conn, id).await? {
            Some(_) => Err(RepositoryError::Conflict(format!(
                "stale version for product {id}"
            ))),
            None => Ok(None),
        },
    }
}

/// Delete a product. Returns `false` if no row matched.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(conn: &mut SqliteConnection, id: ProductId) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id.as_i64())
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

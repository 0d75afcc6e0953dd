//! Cart and cart item repository.
//!
//! Carts are the only rows mutated under concurrent load; every write to a
//! cart goes through [`update_total`], which bumps the version exactly once
//! per committed mutation.

use sqlx::SqliteConnection;

use buy_recipes_core::{CartId, CartItemId, ProductId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, ProductView};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i64,
    total_in_cents: i64,
    version: i64,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            total_in_cents: row.total_in_cents,
            version: row.version,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    cart_id: i64,
    product_id: i64,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    name: String,
    price_in_cents: i64,
}

/// List all carts, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Cart>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartRow>(
        "SELECT id, total_in_cents, version FROM carts ORDER BY id",
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Get a cart by its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: CartId,
) -> Result<Option<Cart>, RepositoryError> {
    let row = sqlx::query_as::<_, CartRow>(
        "SELECT id, total_in_cents, version FROM carts WHERE id = ?",
    )
    .bind(id.as_i64())
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

/// Insert a new cart with the given starting total and no items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    total_in_cents: i64,
) -> Result<Cart, RepositoryError> {
    let row = sqlx::query_as::<_, CartRow>(
        "INSERT INTO carts (total_in_cents) VALUES (?) \
         RETURNING id, total_in_cents, version",
    )
    .bind(total_in_cents)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Write a cart's total under its version fence.
///
/// The write succeeds only if the persisted version still matches
/// `expected_version`; the version advances by one on success. Returns
/// `Ok(None)` if the row no longer exists.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` on a version mismatch, and
/// `RepositoryError::Database` if the query fails.
pub async fn update_total(
    conn: &mut SqliteConnection,
    id: CartId,
    total_in_cents: i64,
    expected_version: i64,
) -> Result<Option<Cart>, RepositoryError> {
    let row = sqlx::query_as::<_, CartRow>(
        "UPDATE carts SET total_in_cents = ?, version = version + 1 \
         WHERE id = ? AND version = ? \
         RETURNING id, total_in_cents, version",
    )
    .bind(total_in_cents)
    .bind(id.as_i64())
    .bind(expected_version)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(row.into())),
        None => match find_by_id(conn, id).await? {
            Some(_) => Err(RepositoryError::Conflict(format!(
                "stale version for cart {id}"
            ))),
            None => Ok(None),
        },
    }
}

/// Delete a cart row. Returns `false` if no row matched.
///
/// Item rows are cascaded by the caller inside the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(conn: &mut SqliteConnection, id: CartId) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM carts WHERE id = ?")
        .bind(id.as_i64())
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List the item rows belonging to a cart, ordered by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_items(
    conn: &mut SqliteConnection,
    cart_id: CartId,
) -> Result<Vec<CartItem>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, cart_id, product_id FROM cart_items WHERE cart_id = ? ORDER BY id",
    )
    .bind(cart_id.as_i64())
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Find the first item row matching (cart, product), if any.
///
/// When a cart holds several units of the same product, this returns the
/// oldest row, so repeated removals peel off one unit per call.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_first_item(
    conn: &mut SqliteConnection,
    cart_id: CartId,
    product_id: ProductId,
) -> Result<Option<CartItemId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM cart_items WHERE cart_id = ? AND product_id = ? ORDER BY id LIMIT 1",
    )
    .bind(cart_id.as_i64())
    .bind(product_id.as_i64())
    .fetch_optional(conn)
    .await?;

    Ok(id.map(CartItemId::new))
}

/// Insert one unit-membership row for a product in a cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_item(
    conn: &mut SqliteConnection,
    cart_id: CartId,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    sqlx::query("INSERT INTO cart_items (cart_id, product_id) VALUES (?, ?)")
        .bind(cart_id.as_i64())
        .bind(product_id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

/// Delete a single item row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_item(
    conn: &mut SqliteConnection,
    id: CartItemId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM cart_items WHERE id = ?")
        .bind(id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

/// Delete all item rows belonging to a cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_items(
    conn: &mut SqliteConnection,
    cart_id: CartId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
        .bind(cart_id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

/// Sum the current prices of all products referenced by a cart's items.
///
/// This is the full total resync: items whose product has been deleted
/// contribute nothing (they are dropped by the join), and every unit of a
/// product counts once at the product's current price.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn sum_current_prices(
    conn: &mut SqliteConnection,
    cart_id: CartId,
) -> Result<i64, RepositoryError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(p.price_in_cents), 0) \
         FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = ?",
    )
    .bind(cart_id.as_i64())
    .fetch_one(conn)
    .await?;

    Ok(total)
}

/// Resolve a cart's items to product views at read time.
/// Items whose product has been deleted are dropped by the join.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn line_items(
    conn: &mut SqliteConnection,
    cart_id: CartId,
) -> Result<Vec<ProductView>, RepositoryError> {
    let rows = sqlx::query_as::<_, LineItemRow>(
        "SELECT p.id, p.name, p.price_in_cents \
         FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = ? \
         ORDER BY ci.id",
    )
    .bind(cart_id.as_i64())
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ProductView {
            id: ProductId::new(row.id),
            name: row.name,
            price_in_cents: row.price_in_cents,
        })
        .collect())
}

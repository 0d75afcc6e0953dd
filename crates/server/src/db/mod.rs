//! Database operations for the `SQLite` store.
//!
//! # Tables
//!
//! - `products` - Catalog of purchasable products
//! - `recipes` - Recipe headers
//! - `recipe_ingredients` - Recipe-to-product association rows
//! - `carts` - Shopping carts with a denormalized running total
//! - `cart_items` - One unit-membership row per product placed in a cart
//!
//! # Optimistic concurrency
//!
//! Versioned rows are written with a compare-and-swap on the `version`
//! column. A write whose expected version no longer matches the persisted
//! row affects zero rows; repositories translate that into
//! [`RepositoryError::Conflict`], distinct from a missing row.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p buy-recipes-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;

pub mod carts;
pub mod products;
pub mod recipe_ingredients;
pub mod recipes;

/// Embedded migrations for the server schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Version-fenced write lost against a concurrent mutation.
    #[error("version conflict: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

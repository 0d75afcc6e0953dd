//! CLI command implementations.

use secrecy::SecretString;
use sqlx::SqlitePool;
use tracing::info;

use buy_recipes_server::{db, seed};

const DEFAULT_DATABASE_URL: &str = "sqlite://buy_recipes.db?mode=rwc";

async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BUYRECIPES_DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn migrate() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}

/// Load the sample dataset, bringing the schema up to date first.
///
/// # Errors
///
/// Returns an error if the connection, a migration or the data load fails.
pub async fn seed() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    db::MIGRATOR.run(&pool).await?;
    let loaded = seed::load_sample_data(&pool).await?;

    if loaded {
        info!("Sample data loaded");
    } else {
        info!("Sample data already present");
    }
    Ok(())
}

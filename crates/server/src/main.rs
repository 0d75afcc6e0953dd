//! Buy Recipes server - REST backend for products, recipes and carts.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in/out
//! - `SQLite` via sqlx for persistence
//! - Optimistic concurrency (version fence) on every mutable entity
//! - The cart engine keeps each cart's denormalized total consistent with
//!   its items by a full resync inside every mutating transaction

#![cfg_attr(not(test), forbid(unsafe_code))]

use buy_recipes_server::config::ServerConfig;
use buy_recipes_server::state::AppState;
use buy_recipes_server::{db, routes, seed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter; defaults to info level for our
    // crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "buy_recipes_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool and bring the schema up to date
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    if config.seed_on_startup {
        seed::load_sample_data(&pool)
            .await
            .expect("Failed to load sample data");
    }

    let addr = config.socket_addr();
    let state = AppState::new(config, pool);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await.expect("Server error");
}

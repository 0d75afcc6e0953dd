//! Integration test support for Buy Recipes.
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart engine semantics against a real store
//! - `concurrency` - Version-fence behavior under concurrent writes
//! - `rest_api` - HTTP surface driven through a spawned server
//! - `seeding` - Sample data loading
//!
//! Tests run against in-memory `SQLite` databases, so no external services
//! are required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use buy_recipes_server::config::ServerConfig;
use buy_recipes_server::state::AppState;
use buy_recipes_server::{db, routes};

/// Create a migrated in-memory database pool.
///
/// A single connection is used so the in-memory database survives for the
/// lifetime of the pool; idle reaping is disabled for the same reason.
///
/// # Panics
///
/// Panics if the pool cannot be created or migrations fail.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to create test pool");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// A server spawned on an ephemeral port for HTTP-level tests.
pub struct TestServer {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Spawn the full application router on 127.0.0.1 with a fresh
    /// in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let pool = test_pool().await;

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: [127, 0, 0, 1].into(),
            port: 0,
            seed_on_startup: false,
        };
        let app = routes::router(AppState::new(config, pool.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server error");
        });

        Self {
            addr,
            pool,
            client: reqwest::Client::new(),
        }
    }

    /// Build a full URL for a request path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

//! Buy Recipes CLI - Database migrations and sample data tools.
//!
//! # Usage
//!
//! ```bash
//! # Bring the schema up to date
//! buy-recipes-cli migrate
//!
//! # Load the sample catalog, recipes and carts (idempotent)
//! buy-recipes-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `BUYRECIPES_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://buy_recipes.db?mode=rwc`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "buy-recipes-cli")]
#[command(author, version, about = "Buy Recipes CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load sample data (runs migrations first)
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate().await?,
        Commands::Seed => commands::seed().await?,
    }
    Ok(())
}

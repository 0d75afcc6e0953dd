//! Sample data loading.
//!
//! Seeds a small grocery catalog, three recipes and two empty carts.
//! Loading is idempotent: it only runs when the products table is empty.

use sqlx::{SqliteConnection, SqlitePool};

use buy_recipes_core::{ProductId, RecipeId};

use crate::db::{self, RepositoryError};

const PRODUCTS: &[(&str, i64)] = &[
    ("Flour", 299),
    ("Sugar", 199),
    ("Eggs", 349),
    ("Butter", 449),
    ("Chocolate Chips", 399),
    ("Vanilla Extract", 599),
    ("Baking Powder", 149),
    ("Salt", 99),
    ("Milk", 279),
    ("Tomatoes", 229),
    ("Cheese", 549),
    ("Pasta", 159),
    ("Olive Oil", 799),
    ("Garlic", 89),
    ("Basil", 299),
];

/// Load the sample dataset if the catalog is empty.
///
/// Returns `true` if data was loaded, `false` if it already existed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any insert fails; the whole load
/// is transactional, so a failure leaves the store untouched.
pub async fn load_sample_data(pool: &SqlitePool) -> Result<bool, RepositoryError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tracing::info!("Sample data already exists, skipping data loading");
        return Ok(false);
    }

    tracing::info!("Loading sample data...");

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, price) in PRODUCTS {
        let product = db::products::insert(&mut tx, name, *price).await?;
        product_ids.push(product.id);
    }
    let by_name = |name: &str| -> ProductId {
        let index = PRODUCTS
            .iter()
            .position(|(n, _)| *n == name)
            .expect("seed recipe references a product missing from PRODUCTS");
        product_ids[index]
    };

    let cookies = db::recipes::insert(
        &mut tx,
        "Chocolate Chip Cookies",
        "Classic homemade chocolate chip cookies that everyone loves",
    )
    .await?;
    add_ingredients(
        &mut tx,
        cookies.id,
        &[
            (by_name("Flour"), 2, "cups"),
            (by_name("Sugar"), 1, "cup"),
            (by_name("Eggs"), 4, "pieces"),
            (by_name("Butter"), 1, "cup"),
            (by_name("Chocolate Chips"), 12, "ounces"),
            (by_name("Vanilla Extract"), 2, "teaspoons"),
            (by_name("Baking Powder"), 1, "teaspoon"),
            (by_name("Salt"), 1, "pinch"),
        ],
    )
    .await?;

    let pancakes = db::recipes::insert(
        &mut tx,
        "Pancakes",
        "Fluffy breakfast pancakes perfect for weekend mornings",
    )
    .await?;
    add_ingredients(
        &mut tx,
        pancakes.id,
        &[
            (by_name("Flour"), 1, "cup"),
            (by_name("Sugar"), 3, "tablespoons"),
            (by_name("Eggs"), 7, "pieces"),
            (by_name("Butter"), 2, "tablespoons"),
            (by_name("Milk"), 1, "cup"),
            (by_name("Baking Powder"), 1, "teaspoon"),
            (by_name("Salt"), 1, "pinch"),
        ],
    )
    .await?;

    let pasta = db::recipes::insert(
        &mut tx,
        "Pasta Marinara",
        "Simple and delicious pasta with tomato sauce",
    )
    .await?;
    add_ingredients(
        &mut tx,
        pasta.id,
        &[
            (by_name("Pasta"), 1, "pound"),
            (by_name("Tomatoes"), 8, "pieces"),
            (by_name("Cheese"), 6, "ounces"),
            (by_name("Olive Oil"), 1, "cup"),
            (by_name("Garlic"), 2, "cloves"),
            (by_name("Basil"), 1, "bunch"),
            (by_name("Salt"), 1, "to taste"),
        ],
    )
    .await?;

    db::carts::insert(&mut tx, 0).await?;
    db::carts::insert(&mut tx, 0).await?;

    tx.commit().await?;
    tracing::info!("Loaded sample data");
    Ok(true)
}

async fn add_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: RecipeId,
    rows: &[(ProductId, i64, &str)],
) -> Result<(), RepositoryError> {
    for (product_id, quantity, unit) in rows {
        db::recipe_ingredients::insert(conn, recipe_id, *product_id, *quantity, unit).await?;
    }
    Ok(())
}

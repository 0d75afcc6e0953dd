//! Sample data loading tests.

use buy_recipes_integration_tests::test_pool;
use buy_recipes_server::db;
use buy_recipes_server::seed::load_sample_data;
use buy_recipes_server::services::CartService;

#[tokio::test]
async fn loads_full_dataset_into_empty_store() {
    let pool = test_pool().await;

    assert!(load_sample_data(&pool).await.unwrap());

    let mut conn = pool.acquire().await.unwrap();
    let products = db::products::find_all(&mut conn).await.unwrap();
    assert_eq!(products.len(), 15);

    let recipes = db::recipes::find_all(&mut conn).await.unwrap();
    assert_eq!(recipes.len(), 3);
    assert_eq!(recipes[0].name, "Chocolate Chip Cookies");

    let ingredients = db::recipe_ingredients::find_all(&mut conn).await.unwrap();
    assert_eq!(ingredients.len(), 8 + 7 + 7);

    let carts = db::carts::find_all(&mut conn).await.unwrap();
    assert_eq!(carts.len(), 2);
    assert!(carts.iter().all(|c| c.total_in_cents == 0));
}

#[tokio::test]
async fn loading_twice_is_a_noop() {
    let pool = test_pool().await;

    assert!(load_sample_data(&pool).await.unwrap());
    assert!(!load_sample_data(&pool).await.unwrap());

    let mut conn = pool.acquire().await.unwrap();
    let products = db::products::find_all(&mut conn).await.unwrap();
    assert_eq!(products.len(), 15);
}

#[tokio::test]
async fn guard_trips_on_any_existing_product() {
    let pool = test_pool().await;

    let mut conn = pool.acquire().await.unwrap();
    db::products::insert(&mut conn, "Flour", 299).await.unwrap();
    drop(conn);

    assert!(!load_sample_data(&pool).await.unwrap());

    let mut conn = pool.acquire().await.unwrap();
    let products = db::products::find_all(&mut conn).await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn seeded_recipe_expands_into_a_cart() {
    let pool = test_pool().await;
    load_sample_data(&pool).await.unwrap();

    let (cart_id, cookies_id) = {
        let mut conn = pool.acquire().await.unwrap();
        let carts = db::carts::find_all(&mut conn).await.unwrap();
        let recipes = db::recipes::find_all(&mut conn).await.unwrap();
        let cookies = recipes
            .iter()
            .find(|r| r.name == "Chocolate Chip Cookies")
            .unwrap();
        (carts[0].id, cookies.id)
    };

    let service = CartService::new(&pool);
    let cart = service
        .add_recipe(cart_id, cookies_id)
        .await
        .unwrap()
        .unwrap();

    // One item per ingredient row, priced at current product prices:
    // 299 + 199 + 349 + 449 + 399 + 599 + 149 + 99
    assert_eq!(cart.items.len(), 8);
    assert_eq!(cart.total_in_cents, 2542);
}

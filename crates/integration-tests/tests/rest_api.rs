//! HTTP surface tests driven through a spawned server.
//!
//! Each test boots the full router on an ephemeral port with a fresh
//! in-memory database and talks to it over real HTTP.

use reqwest::StatusCode;
use serde_json::{Value, json};

use buy_recipes_integration_tests::TestServer;

async fn post(server: &TestServer, path: &str, body: Value) -> reqwest::Response {
    server
        .client
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn put(server: &TestServer, path: &str, body: Value) -> reqwest::Response {
    server
        .client
        .put(server.url(path))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn get(server: &TestServer, path: &str) -> reqwest::Response {
    server.client.get(server.url(path)).send().await.unwrap()
}

async fn delete(server: &TestServer, path: &str) -> reqwest::Response {
    server.client.delete(server.url(path)).send().await.unwrap()
}

async fn create_product(server: &TestServer, name: &str, price_in_cents: i64) -> i64 {
    let response = post(
        server,
        "/products",
        json!({ "name": name, "priceInCents": price_in_cents }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_recipe(server: &TestServer, name: &str) -> i64 {
    let response = post(server, "/recipes", json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn add_ingredient(server: &TestServer, recipe_id: i64, product_id: i64, quantity: i64) {
    let response = post(
        server,
        "/recipe-ingredients",
        json!({ "recipeId": recipe_id, "productId": product_id, "quantity": quantity }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_and_health_respond() {
    let server = TestServer::spawn().await;

    let root = get(&server, "/").await;
    assert_eq!(root.status(), StatusCode::OK);
    let info: Value = root.json().await.unwrap();
    assert!(info["name"].as_str().is_some());

    let health = get(&server, "/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn product_crud_round_trip() {
    let server = TestServer::spawn().await;

    let id = create_product(&server, "Flour", 299).await;

    let shown: Value = get(&server, &format!("/products/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(shown["name"], "Flour");
    assert_eq!(shown["priceInCents"], 299);

    let updated = put(
        &server,
        &format!("/products/{id}"),
        json!({ "name": "Bread Flour", "priceInCents": 349 }),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = updated.json().await.unwrap();
    assert_eq!(updated["name"], "Bread Flour");
    assert_eq!(updated["priceInCents"], 349);

    let listed: Value = get(&server, "/products").await.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    assert_eq!(
        delete(&server, &format!("/products/{id}")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        get(&server, &format!("/products/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        delete(&server, &format!("/products/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn product_validation_errors() {
    let server = TestServer::spawn().await;

    // Name is required
    let response = post(&server, "/products", json!({ "priceInCents": 100 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("name"));

    // Negative price is rejected
    let response = post(
        &server,
        "/products",
        json!({ "name": "Flour", "priceInCents": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Price defaults to 0
    let response = post(&server, "/products", json!({ "name": "Water" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["priceInCents"], 0);
}

#[tokio::test]
async fn recipe_view_resolves_ingredients() {
    let server = TestServer::spawn().await;

    let flour = create_product(&server, "Flour", 299).await;
    let sugar = create_product(&server, "Sugar", 199).await;
    let recipe = create_recipe(&server, "Cookies").await;
    add_ingredient(&server, recipe, flour, 2).await;
    add_ingredient(&server, recipe, sugar, 1).await;

    let shown: Value = get(&server, &format!("/recipes/{recipe}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(shown["name"], "Cookies");
    let ingredients = shown["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0]["name"], "Flour");
    assert_eq!(ingredients[0]["quantity"], 2);
    assert_eq!(ingredients[0]["priceInCents"], 299);

    let by_recipe: Value = get(&server, &format!("/recipe-ingredients/recipe/{recipe}"))
        .await
        .json()
        .await
        .unwrap();
    let rows = by_recipe.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["productName"], "Flour");

    let by_product: Value = get(&server, &format!("/recipe-ingredients/product/{sugar}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(by_product.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ingredient_references_must_exist() {
    let server = TestServer::spawn().await;
    let flour = create_product(&server, "Flour", 299).await;
    let recipe = create_recipe(&server, "Cookies").await;

    let missing_recipe = post(
        &server,
        "/recipe-ingredients",
        json!({ "recipeId": 9999, "productId": flour }),
    )
    .await;
    assert_eq!(missing_recipe.status(), StatusCode::NOT_FOUND);

    let missing_product = post(
        &server,
        "/recipe-ingredients",
        json!({ "recipeId": recipe, "productId": 9999 }),
    )
    .await;
    assert_eq!(missing_product.status(), StatusCode::NOT_FOUND);

    let missing_field = post(
        &server,
        "/recipe-ingredients",
        json!({ "recipeId": recipe }),
    )
    .await;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_recipe_cascades_its_ingredients() {
    let server = TestServer::spawn().await;
    let flour = create_product(&server, "Flour", 299).await;
    let recipe = create_recipe(&server, "Cookies").await;
    add_ingredient(&server, recipe, flour, 1).await;

    assert_eq!(
        delete(&server, &format!("/recipes/{recipe}")).await.status(),
        StatusCode::OK
    );

    let orphans: Value = get(&server, "/recipe-ingredients")
        .await
        .json()
        .await
        .unwrap();
    assert!(orphans.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cart_flow_over_http() {
    let server = TestServer::spawn().await;
    let flour = create_product(&server, "Flour", 299).await;
    let sugar = create_product(&server, "Sugar", 199).await;
    let recipe = create_recipe(&server, "Cookies").await;
    add_ingredient(&server, recipe, flour, 2).await;
    add_ingredient(&server, recipe, sugar, 1).await;

    // Create: total defaults to 0, no items
    let cart: Value = post(&server, "/carts", json!({}))
        .await
        .json()
        .await
        .unwrap();
    let cart_id = cart["id"].as_i64().unwrap();
    assert_eq!(cart["totalInCents"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());

    // Add a product
    let cart: Value = post(
        &server,
        &format!("/carts/{cart_id}/add_product"),
        json!({ "productId": flour }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(cart["totalInCents"], 299);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    // Expand the recipe
    let cart: Value = post(
        &server,
        &format!("/carts/{cart_id}/add_recipe"),
        json!({ "recipeId": recipe }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(cart["totalInCents"], 299 + 299 + 199);
    assert_eq!(cart["items"].as_array().unwrap().len(), 3);

    // Remove the recipe again
    let cart: Value = delete(&server, &format!("/carts/{cart_id}/recipes/{recipe}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cart["totalInCents"], 299);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    // Remove the remaining product
    let cart: Value = delete(&server, &format!("/carts/{cart_id}/products/{flour}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cart["totalInCents"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());

    // Overwrite the total directly
    let cart: Value = put(
        &server,
        &format!("/carts/{cart_id}"),
        json!({ "totalInCents": 500 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(cart["totalInCents"], 500);

    // Delete, then the cart is gone
    assert_eq!(
        delete(&server, &format!("/carts/{cart_id}")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        get(&server, &format!("/carts/{cart_id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn cart_error_mapping() {
    let server = TestServer::spawn().await;
    let flour = create_product(&server, "Flour", 299).await;

    let cart: Value = post(&server, "/carts", json!({}))
        .await
        .json()
        .await
        .unwrap();
    let cart_id = cart["id"].as_i64().unwrap();

    // Missing cart
    assert_eq!(
        post(&server, "/carts/9999/add_product", json!({ "productId": flour }))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );

    // Missing product
    assert_eq!(
        post(
            &server,
            &format!("/carts/{cart_id}/add_product"),
            json!({ "productId": 9999 })
        )
        .await
        .status(),
        StatusCode::NOT_FOUND
    );

    // Missing required body fields
    assert_eq!(
        post(&server, &format!("/carts/{cart_id}/add_product"), json!({}))
            .await
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        post(&server, &format!("/carts/{cart_id}/add_recipe"), json!({}))
            .await
            .status(),
        StatusCode::BAD_REQUEST
    );

    // Empty or missing recipe on add
    assert_eq!(
        post(
            &server,
            &format!("/carts/{cart_id}/add_recipe"),
            json!({ "recipeId": 9999 })
        )
        .await
        .status(),
        StatusCode::NOT_FOUND
    );
    let empty = create_recipe(&server, "Empty").await;
    assert_eq!(
        post(
            &server,
            &format!("/carts/{cart_id}/add_recipe"),
            json!({ "recipeId": empty })
        )
        .await
        .status(),
        StatusCode::NOT_FOUND
    );

    // Removing a product that is not in the cart is not an error
    let response = delete(&server, &format!("/carts/{cart_id}/products/{flour}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Negative totals are rejected
    assert_eq!(
        post(&server, "/carts", json!({ "totalInCents": -5 }))
            .await
            .status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn stale_version_update_is_a_conflict() {
    let server = TestServer::spawn().await;

    let cart: Value = post(&server, "/carts", json!({}))
        .await
        .json()
        .await
        .unwrap();
    let cart_id = cart["id"].as_i64().unwrap();
    let version = cart["version"].as_i64().unwrap();

    // A write fenced with the version we just read lands
    let response = put(
        &server,
        &format!("/carts/{cart_id}"),
        json!({ "totalInCents": 100, "version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["version"].as_i64().unwrap(), version + 1);

    // Replaying the same fence after the cart moved on is a 409, not a
    // 404 or a silent overwrite
    let response = put(
        &server,
        &format!("/carts/{cart_id}"),
        json!({ "totalInCents": 200, "version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("stale"));

    // The losing write changed nothing
    let shown: Value = get(&server, &format!("/carts/{cart_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(shown["totalInCents"], 100);
}

#[tokio::test]
async fn error_body_carries_a_message() {
    let server = TestServer::spawn().await;

    let response = get(&server, "/products/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

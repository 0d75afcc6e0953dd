//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                      - Service info
//! GET    /health                                - Health check
//!
//! # Products
//! GET    /products                              - List products
//! POST   /products                              - Create product
//! GET    /products/{id}                         - Get product
//! PUT    /products/{id}                         - Update product (version-fenced)
//! DELETE /products/{id}                         - Delete product
//!
//! # Recipes
//! GET    /recipes                               - List recipes with resolved ingredients
//! POST   /recipes                               - Create recipe
//! GET    /recipes/{id}                          - Get recipe
//! PUT    /recipes/{id}                          - Update recipe (version-fenced)
//! DELETE /recipes/{id}                          - Delete recipe (cascades ingredients)
//!
//! # Recipe ingredients
//! GET    /recipe-ingredients                    - List ingredient rows
//! POST   /recipe-ingredients                    - Create ingredient row
//! GET    /recipe-ingredients/{id}               - Get ingredient row
//! PUT    /recipe-ingredients/{id}               - Update ingredient row (version-fenced)
//! DELETE /recipe-ingredients/{id}               - Delete ingredient row
//! GET    /recipe-ingredients/recipe/{recipeId}  - List by recipe
//! GET    /recipe-ingredients/product/{productId} - List by product
//!
//! # Carts
//! GET    /carts                                 - List carts
//! POST   /carts                                 - Create cart
//! GET    /carts/{id}                            - Get cart
//! PUT    /carts/{id}                            - Overwrite cart total (version-fenced)
//! DELETE /carts/{id}                            - Delete cart (cascades items)
//! POST   /carts/{id}/add_product                - Add one product unit {productId}
//! DELETE /carts/{id}/products/{productId}       - Remove one product unit
//! POST   /carts/{id}/add_recipe                 - Expand recipe into cart {recipeId}
//! DELETE /carts/{id}/recipes/{recipeId}         - Remove recipe ingredients (best-effort)
//! ```

pub mod carts;
pub mod home;
pub mod products;
pub mod recipe_ingredients;
pub mod recipes;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::index).post(recipes::create))
        .route(
            "/{id}",
            get(recipes::show)
                .put(recipes::update)
                .delete(recipes::destroy),
        )
}

/// Create the recipe ingredient routes router.
pub fn recipe_ingredient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(recipe_ingredients::index).post(recipe_ingredients::create),
        )
        .route(
            "/{id}",
            get(recipe_ingredients::show)
                .put(recipe_ingredients::update)
                .delete(recipe_ingredients::destroy),
        )
        .route("/recipe/{recipe_id}", get(recipe_ingredients::by_recipe))
        .route("/product/{product_id}", get(recipe_ingredients::by_product))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(carts::index).post(carts::create))
        .route(
            "/{id}",
            get(carts::show).put(carts::update).delete(carts::destroy),
        )
        .route("/{id}/add_product", post(carts::add_product))
        .route(
            "/{id}/products/{product_id}",
            delete(carts::remove_product),
        )
        .route("/{id}/add_recipe", post(carts::add_recipe))
        .route("/{id}/recipes/{recipe_id}", delete(carts::remove_recipe))
}

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .nest("/products", product_routes())
        .nest("/recipes", recipe_routes())
        .nest("/recipe-ingredients", recipe_ingredient_routes())
        .nest("/carts", cart_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

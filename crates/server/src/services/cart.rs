//! Cart engine: maintains cart contents and keeps the denormalized total
//! consistent with membership under concurrent mutation.
//!
//! # Invariant
//!
//! After every successful mutating call,
//! `cart.total_in_cents == sum(current price of each item's product)`.
//! The total is recomputed by a full resync (re-query and re-sum of all
//! items) rather than incremental deltas, so the invariant holds no matter
//! how many items a single call touched.
//!
//! # Concurrency
//!
//! Each operation that reads-then-writes a cart runs inside one database
//! transaction, and the final cart write is version-fenced: it succeeds
//! only against the version read at the start of the operation, advancing
//! it exactly once per committed mutation. On a mismatch the whole
//! operation fails with [`RepositoryError::Conflict`] and no partial item
//! mutation survives. The engine never retries internally; callers re-read
//! and reapply.
//!
//! # Not-found semantics
//!
//! Missing carts (and, for adds, missing products/recipes) surface as
//! `Ok(None)`; the REST boundary maps that to 404. A recipe with zero
//! ingredient rows is treated identically to a missing recipe on add,
//! matching the original system's behavior.

use sqlx::{SqliteConnection, SqlitePool};

use buy_recipes_core::{CartId, CartItemId, ProductId, RecipeId};

use crate::db::{self, RepositoryError};
use crate::models::{Cart, CartView};

/// Service owning all cart reads and mutations.
pub struct CartService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all carts with their resolved items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<CartView>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let carts = db::carts::find_all(&mut conn).await?;

        let mut views = Vec::with_capacity(carts.len());
        for cart in carts {
            let items = db::carts::line_items(&mut conn, cart.id).await?;
            views.push(CartView {
                id: cart.id,
                total_in_cents: cart.total_in_cents,
                version: cart.version,
                items,
            });
        }
        Ok(views)
    }

    /// Get one cart with its resolved items, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, cart_id: CartId) -> Result<Option<CartView>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let Some(cart) = db::carts::find_by_id(&mut conn, cart_id).await? else {
            return Ok(None);
        };
        let items = db::carts::line_items(&mut conn, cart_id).await?;
        Ok(Some(CartView {
            id: cart.id,
            total_in_cents: cart.total_in_cents,
            version: cart.version,
            items,
        }))
    }

    /// Create a cart with the given starting total and no items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, total_in_cents: i64) -> Result<CartView, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let cart = db::carts::insert(&mut conn, total_in_cents).await?;
        tracing::debug!(cart_id = %cart.id, "Created cart");
        Ok(CartView {
            id: cart.id,
            total_in_cents: cart.total_in_cents,
            version: cart.version,
            items: Vec::new(),
        })
    }

    /// Overwrite a cart's total directly, bypassing recomputation from
    /// items. Intended for manual total corrections.
    ///
    /// When `expected_version` is supplied it is used as the write fence
    /// (the version the caller last read); otherwise the fence is the
    /// version read fresh inside this transaction.
    ///
    /// Returns `None` if the cart is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the fence is stale, and
    /// `RepositoryError::Database` if a query fails.
    pub async fn update_total(
        &self,
        cart_id: CartId,
        total_in_cents: i64,
        expected_version: Option<i64>,
    ) -> Result<Option<CartView>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = db::carts::find_by_id(&mut tx, cart_id).await? else {
            return Ok(None);
        };
        let fence = expected_version.unwrap_or(cart.version);
        let Some(updated) =
            db::carts::update_total(&mut tx, cart_id, total_in_cents, fence).await?
        else {
            return Ok(None);
        };
        let items = db::carts::line_items(&mut tx, cart_id).await?;
        tx.commit().await?;

        Ok(Some(CartView {
            id: updated.id,
            total_in_cents: updated.total_in_cents,
            version: updated.version,
            items,
        }))
    }

    /// Delete a cart, cascading to its items. Returns `false` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(&self, cart_id: CartId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        if db::carts::find_by_id(&mut tx, cart_id).await?.is_none() {
            return Ok(false);
        }
        db::carts::delete_items(&mut tx, cart_id).await?;
        db::carts::delete(&mut tx, cart_id).await?;
        tx.commit().await?;
        tracing::debug!(cart_id = %cart_id, "Deleted cart");
        Ok(true)
    }

    /// Add one unit of a product to a cart and resync the total.
    ///
    /// Returns `None` if the cart or the product is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent mutation won the
    /// version fence, and `RepositoryError::Database` if a query fails.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartView>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = db::carts::find_by_id(&mut tx, cart_id).await? else {
            return Ok(None);
        };
        if db::products::find_by_id(&mut tx, product_id).await?.is_none() {
            return Ok(None);
        }

        db::carts::insert_item(&mut tx, cart_id, product_id).await?;
        self.finish_mutation(tx, &cart).await
    }

    /// Remove one unit of a product from a cart and resync the total.
    ///
    /// Removing a product that is not in the cart is a no-op that still
    /// returns the cart. If several items reference the product, only the
    /// oldest is removed.
    ///
    /// Returns `None` only if the cart itself is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent mutation won the
    /// version fence, and `RepositoryError::Database` if a query fails.
    pub async fn remove_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartView>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = db::carts::find_by_id(&mut tx, cart_id).await? else {
            return Ok(None);
        };

        if let Some(item_id) = db::carts::find_first_item(&mut tx, cart_id, product_id).await? {
            db::carts::delete_item(&mut tx, item_id).await?;
        }
        self.finish_mutation(tx, &cart).await
    }

    /// Expand a recipe into the cart: one item per ingredient row (the
    /// declared quantity does not multiply items), then resync the total.
    ///
    /// Returns `None` if the cart is absent, or if the recipe has no
    /// ingredient rows — a nonexistent recipe and an empty one are
    /// indistinguishable here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent mutation won the
    /// version fence, and `RepositoryError::Database` if a query fails.
    pub async fn add_recipe(
        &self,
        cart_id: CartId,
        recipe_id: RecipeId,
    ) -> Result<Option<CartView>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = db::carts::find_by_id(&mut tx, cart_id).await? else {
            return Ok(None);
        };
        let ingredients = db::recipe_ingredients::find_by_recipe_id(&mut tx, recipe_id).await?;
        if ingredients.is_empty() {
            return Ok(None);
        }

        for ingredient in &ingredients {
            db::carts::insert_item(&mut tx, cart_id, ingredient.product_id).await?;
        }
        tracing::debug!(
            cart_id = %cart_id,
            recipe_id = %recipe_id,
            items = ingredients.len(),
            "Expanded recipe into cart"
        );
        self.finish_mutation(tx, &cart).await
    }

    /// Remove a recipe's ingredients from a cart, best-effort: for each
    /// ingredient row, at most one matching item is removed; ingredients
    /// with no matching item are skipped. Then resync the total.
    ///
    /// All lookups resolve before any deletion, so two ingredient rows
    /// naming the same product match the same (oldest) item and remove one
    /// unit between them, not two.
    ///
    /// A recipe with no ingredient rows leaves the cart unchanged (its
    /// version included). Returns `None` only if the cart is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent mutation won the
    /// version fence, and `RepositoryError::Database` if a query fails.
    pub async fn remove_recipe(
        &self,
        cart_id: CartId,
        recipe_id: RecipeId,
    ) -> Result<Option<CartView>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = db::carts::find_by_id(&mut tx, cart_id).await? else {
            return Ok(None);
        };
        let ingredients = db::recipe_ingredients::find_by_recipe_id(&mut tx, recipe_id).await?;
        if ingredients.is_empty() {
            let items = db::carts::line_items(&mut tx, cart_id).await?;
            return Ok(Some(CartView {
                id: cart.id,
                total_in_cents: cart.total_in_cents,
                version: cart.version,
                items,
            }));
        }

        let mut matched: Vec<CartItemId> = Vec::with_capacity(ingredients.len());
        for ingredient in &ingredients {
            if let Some(item_id) =
                db::carts::find_first_item(&mut tx, cart_id, ingredient.product_id).await?
                && !matched.contains(&item_id)
            {
                matched.push(item_id);
            }
        }
        for item_id in matched {
            db::carts::delete_item(&mut tx, item_id).await?;
        }
        self.finish_mutation(tx, &cart).await
    }

    /// Complete a cart mutation: full total resync, version-fenced cart
    /// write, commit, and projection of the updated cart.
    async fn finish_mutation(
        &self,
        mut tx: sqlx::Transaction<'_, sqlx::Sqlite>,
        cart: &Cart,
    ) -> Result<Option<CartView>, RepositoryError> {
        let Some(updated) = resync_total(&mut tx, cart).await? else {
            return Ok(None);
        };
        let items = db::carts::line_items(&mut tx, cart.id).await?;
        tx.commit().await?;

        Ok(Some(CartView {
            id: updated.id,
            total_in_cents: updated.total_in_cents,
            version: updated.version,
            items,
        }))
    }
}

/// Recompute a cart's total from its current items and write it under the
/// version read at the start of the operation.
async fn resync_total(
    conn: &mut SqliteConnection,
    cart: &Cart,
) -> Result<Option<Cart>, RepositoryError> {
    let total = db::carts::sum_current_prices(conn, cart.id).await?;
    db::carts::update_total(conn, cart.id, total, cart.version).await
}

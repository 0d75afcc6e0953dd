//! Domain models and read-time view types.
//!
//! Domain types mirror persisted rows (including the optimistic-lock
//! `version`); view types are the JSON shapes returned by the REST surface.
//! Only the cart view exposes its version counter, so clients can fence
//! their own total updates.

pub mod cart;
pub mod product;
pub mod recipe;
pub mod recipe_ingredient;

pub use cart::{Cart, CartItem, CartView};
pub use product::{Product, ProductView};
pub use recipe::{Recipe, RecipeLineItem, RecipeView};
pub use recipe_ingredient::{RecipeIngredient, RecipeIngredientView};

//! Core types for Buy Recipes.

pub mod id;

pub use id::*;

//! Business services.
//!
//! Product, recipe and ingredient CRUD is thin enough to live in the route
//! handlers; the cart engine is the one piece with real invariants and gets
//! a dedicated service.

pub mod cart;

pub use cart::CartService;

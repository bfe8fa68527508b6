//! # store — persistence boundary for TypedRecipes
//!
//! This crate is the only place a concrete database technology appears.
//! Everything above it (validation, credential hashing, services) talks to
//! the [`UserStore`] and [`RecipeStore`] traits, so the backend can be
//! swapped without touching the validation layer.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | The `User`, `Recipe`, and `Image` entity records |
//! | [`gateway`] | The storage capability traits |
//! | [`error`] | [`StoreError`] — the uniform failure shape of the gateway |
//!
//! Two implementations ship with the crate: [`PgStore`] (PostgreSQL via
//! sqlx) for production and [`MemoryStore`] for tests and offline work.

pub mod error;
pub mod gateway;
pub mod models;

mod memory;
pub use memory::MemoryStore;

mod postgres;
pub use postgres::PgStore;

pub use error::StoreError;
pub use gateway::{RecipeStore, UserStore};
pub use models::{Image, Recipe, User};

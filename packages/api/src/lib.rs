//! # api — account and credential core for TypedRecipes
//!
//! This crate sits between the request-handling layer and the storage
//! backend. It turns raw user-supplied fields into validated, hashed,
//! persisted records and turns a session token back into an authenticated
//! identity. HTTP routing, template rendering, and the concrete database
//! live elsewhere; handlers are expected to go through the services here
//! and never call the storage gateway directly, since that would bypass
//! validation and credential hashing.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Password hashing (Argon2id + pepper), keyed token digests, remember-token generation |
//! | [`error`] | The failure taxonomy: public alerts vs. internal errors |
//! | [`images`] | File-backed gateway for recipe images |
//! | [`models`] | Entity records, re-exported from the `store` crate |
//! | [`recipes`] | Recipe validation chain and service |
//! | [`services`] | Composition root: settings → store → services |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |
//! | [`users`] | User validation chain, service, and authentication |
//! | [`validate`] | The generic fail-fast step runner |

pub mod auth;
pub mod error;
pub mod images;
pub mod models;
pub mod recipes;
pub mod services;
pub mod settings;
pub mod users;
pub mod validate;

pub use error::Error;
pub use images::ImageService;
pub use recipes::RecipeService;
pub use services::Services;
pub use settings::Settings;
pub use users::UserService;

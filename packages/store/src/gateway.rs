//! # Storage gateway traits
//!
//! The capability interfaces the validation layer runs over. Both are
//! plain async traits in the same style as the rest of the workspace;
//! services are generic over the implementation, so production code binds
//! [`crate::PgStore`] and tests bind [`crate::MemoryStore`] without any
//! other change.
//!
//! `create` takes the record mutably so the store can assign the surrogate
//! id and timestamps on the way in.

use crate::error::StoreError;
use crate::models::{Recipe, User};

/// Persistence capabilities for user records.
pub trait UserStore {
    /// Persist a new user, assigning `id` and timestamps.
    fn create(
        &self,
        user: &mut User,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    /// Persist changes to an existing user.
    fn update(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<User, StoreError>>;

    /// Look up by an already-normalized email address.
    fn by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<User, StoreError>>;

    /// Look up by the HMAC digest of a remember token.
    fn by_remember_hash(
        &self,
        remember_hash: &str,
    ) -> impl std::future::Future<Output = Result<User, StoreError>>;
}

/// Persistence capabilities for recipe records.
pub trait RecipeStore {
    /// Persist a new recipe, assigning `id` and timestamps.
    fn create(
        &self,
        recipe: &mut Recipe,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    /// Persist changes to an existing recipe.
    fn update(
        &self,
        recipe: &Recipe,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Recipe, StoreError>>;

    /// Every recipe owned by `user_id`, oldest first.
    fn by_user_id(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Recipe>, StoreError>>;
}

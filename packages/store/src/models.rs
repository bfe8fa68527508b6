//! # Entity records
//!
//! The rows handled by the storage gateway, plus the non-persisted
//! [`Image`] reference. `User` carries two in-flight plaintext fields that
//! exist only on candidate records and are cleared by the validation chain
//! the moment the corresponding hash is computed — they never reach the
//! database, which is why they are `#[sqlx(default)]`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A registered account.
#[derive(Debug, Clone, Default, FromRow)]
pub struct User {
    /// Primary key, assigned by the store.
    pub id: i64,
    pub name: String,
    /// Always stored trimmed and lower-cased; unique across all users.
    pub email: String,
    /// Plaintext password of a candidate record; never persisted.
    #[sqlx(default)]
    pub password: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Plaintext remember token of a candidate record; never persisted.
    #[sqlx(default)]
    pub remember: String,
    /// HMAC digest of the remember token; the session lookup key.
    pub remember_hash: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A recipe owned by a user.
#[derive(Debug, Clone, Default, FromRow)]
pub struct Recipe {
    /// Primary key, assigned by the store.
    pub id: i64,
    /// Owning user; always a real account.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    /// Image files for this recipe; filled in by the image gateway, not the
    /// database.
    #[sqlx(skip)]
    pub images: Vec<Image>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named image file scoped to one recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub recipe_id: i64,
    pub filename: String,
}

impl Image {
    /// URL path under which the image is served.
    pub fn path(&self) -> String {
        format!("/images/recipes/{}/{}", self.recipe_id, self.filename)
    }
}

//! # PostgreSQL gateway
//!
//! Production implementation of [`UserStore`] and [`RecipeStore`] on a
//! sqlx connection pool. Lookups use `fetch_optional` and map the missing
//! row to [`StoreError::NotFound`]; everything else surfaces as
//! [`StoreError::Backend`].
//!
//! The schema is created in place with `CREATE TABLE IF NOT EXISTS`
//! statements rather than a migration system. The UNIQUE constraint on
//! `users.email` is what finally guarantees email uniqueness: the
//! validation layer's availability check is a best-effort pre-check with a
//! race window under concurrent signups.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::gateway::{RecipeStore, UserStore};
use crate::models::{Recipe, User};

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    remember_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_RECIPES: &str = "CREATE TABLE IF NOT EXISTS recipes (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users (id),
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    ingredients TEXT NOT NULL DEFAULT '',
    instructions TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_RECIPES_USER_IDX: &str =
    "CREATE INDEX IF NOT EXISTS recipes_user_id_idx ON recipes (user_id)";

/// Postgres-backed storage gateway.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// The underlying pool, for callers that manage sessions or other
    /// tables of their own.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema if it does not exist yet.
    pub async fn auto_migrate(&self) -> Result<(), StoreError> {
        tracing::info!("creating schema if missing");
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_RECIPES).execute(&self.pool).await?;
        sqlx::query(CREATE_RECIPES_USER_IDX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drop and re-create the schema. Dev and test databases only.
    pub async fn destructive_reset(&self) -> Result<(), StoreError> {
        tracing::warn!("dropping all tables");
        sqlx::query("DROP TABLE IF EXISTS recipes")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&self.pool)
            .await?;
        self.auto_migrate().await
    }
}

impl UserStore for PgStore {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) =
            sqlx::query_as(
                "INSERT INTO users (name, email, password_hash, remember_hash)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, created_at, updated_at",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.remember_hash)
            .fetch_one(&self.pool)
            .await?;

        user.id = id;
        user.created_at = Some(created_at);
        user.updated_at = Some(updated_at);
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users
             SET name = $1, email = $2, password_hash = $3, remember_hash = $4,
                 updated_at = NOW()
             WHERE id = $5",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.remember_hash)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn by_remember_hash(&self, remember_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as("SELECT * FROM users WHERE remember_hash = $1")
            .bind(remember_hash)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

impl RecipeStore for PgStore {
    async fn create(&self, recipe: &mut Recipe) -> Result<(), StoreError> {
        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) =
            sqlx::query_as(
                "INSERT INTO recipes (user_id, title, description, ingredients, instructions)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id, created_at, updated_at",
            )
            .bind(recipe.user_id)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(&recipe.ingredients)
            .bind(&recipe.instructions)
            .fetch_one(&self.pool)
            .await?;

        recipe.id = id;
        recipe.created_at = Some(created_at);
        recipe.updated_at = Some(updated_at);
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE recipes
             SET title = $1, description = $2, ingredients = $3, instructions = $4,
                 updated_at = NOW()
             WHERE id = $5",
        )
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(recipe.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<Recipe, StoreError> {
        sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn by_user_id(&self, user_id: i64) -> Result<Vec<Recipe>, StoreError> {
        Ok(
            sqlx::query_as("SELECT * FROM recipes WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }
}

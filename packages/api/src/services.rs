//! # Service wiring
//!
//! [`Services`] is the composition root a server crate consumes: one
//! shared Postgres gateway under the user and recipe services, plus the
//! image file gateway, all configured from [`Settings`]. The store handle
//! stays private so nothing outside this crate can write around the
//! validation chains.

use store::PgStore;

use crate::error::Error;
use crate::images::ImageService;
use crate::recipes::RecipeService;
use crate::settings::Settings;
use crate::users::UserService;

/// Aggregated services over one shared Postgres gateway.
pub struct Services {
    pub users: UserService<PgStore>,
    pub recipes: RecipeService<PgStore>,
    pub images: ImageService,
    store: PgStore,
}

impl Services {
    /// Connect to the database and wire every service from `settings`.
    pub async fn from_settings(settings: &Settings) -> Result<Self, Error> {
        tracing::info!(
            host = %settings.database.host,
            database = %settings.database.database,
            "connecting to postgres"
        );
        let store = PgStore::connect(&settings.database.url()).await?;
        Ok(Self {
            users: UserService::new(store.clone(), &settings.auth.pepper, &settings.auth.hmac),
            recipes: RecipeService::new(store.clone()),
            images: ImageService::new(settings.images.dir.clone()),
            store,
        })
    }

    /// Create the schema if it does not exist yet.
    pub async fn auto_migrate(&self) -> Result<(), Error> {
        Ok(self.store.auto_migrate().await?)
    }

    /// Drop and re-create the schema. Dev and test databases only.
    pub async fn destructive_reset(&self) -> Result<(), Error> {
        Ok(self.store.destructive_reset().await?)
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::StoreError;
use crate::gateway::{RecipeStore, UserStore};
use crate::models::{Recipe, User};

/// In-memory gateway for tests and offline development.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<i64, User>>>,
    recipes: Arc<Mutex<HashMap<i64, Recipe>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<V>(map: &HashMap<i64, V>) -> i64 {
    map.keys().max().copied().unwrap_or(0) + 1
}

impl UserStore for MemoryStore {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        let now = Utc::now();
        user.id = next_id(&users);
        user.created_at = Some(now);
        user.updated_at = Some(now);
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        let mut stored = user.clone();
        stored.updated_at = Some(Utc::now());
        users.insert(stored.id, stored);
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn by_remember_hash(&self, remember_hash: &str) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.remember_hash == remember_hash)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

impl RecipeStore for MemoryStore {
    async fn create(&self, recipe: &mut Recipe) -> Result<(), StoreError> {
        let mut recipes = self.recipes.lock().unwrap();
        let now = Utc::now();
        recipe.id = next_id(&recipes);
        recipe.created_at = Some(now);
        recipe.updated_at = Some(now);
        recipes.insert(recipe.id, recipe.clone());
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.recipes.lock().unwrap();
        if !recipes.contains_key(&recipe.id) {
            return Err(StoreError::NotFound);
        }
        let mut stored = recipe.clone();
        stored.updated_at = Some(Utc::now());
        recipes.insert(stored.id, stored);
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<Recipe, StoreError> {
        self.recipes
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn by_user_id(&self, user_id: i64) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .values()
            .filter(|recipe| recipe.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by_key(|recipe| recipe.id);
        Ok(recipes)
    }
}

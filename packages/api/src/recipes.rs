//! # Recipe service — the same chain shape with a smaller rule set
//!
//! Recipes run through the same [`Validator`] mechanism as users; the
//! chain is just two steps because there are no credentials involved. The
//! service still owns the only write path to [`RecipeStore`].

use store::{Recipe, RecipeStore};

use crate::error::Error;
use crate::validate::Validator;

/// A single rule in the recipe validation chain.
#[derive(Clone, Copy, Debug)]
enum RecipeStep {
    UserRequired,
    TitleRequired,
}

/// Steps shared by create and update, in order.
const RECIPE_STEPS: &[RecipeStep] = &[RecipeStep::UserRequired, RecipeStep::TitleRequired];

struct RecipeValidator<S> {
    store: S,
}

impl<S: RecipeStore> Validator for RecipeValidator<S> {
    type Candidate = Recipe;
    type Step = RecipeStep;

    async fn apply(&self, step: RecipeStep, recipe: &mut Recipe) -> Result<(), Error> {
        match step {
            RecipeStep::UserRequired => {
                if recipe.user_id <= 0 {
                    return Err(Error::UserIdRequired);
                }
                Ok(())
            }
            RecipeStep::TitleRequired => {
                if recipe.title.is_empty() {
                    return Err(Error::TitleRequired);
                }
                Ok(())
            }
        }
    }
}

/// Public recipe operations: the validation chain over a [`RecipeStore`].
pub struct RecipeService<S> {
    validator: RecipeValidator<S>,
}

impl<S: RecipeStore> RecipeService<S> {
    pub fn new(store: S) -> Self {
        Self {
            validator: RecipeValidator { store },
        }
    }

    /// Validate and persist a new recipe; the candidate carries its
    /// storage-assigned id on success.
    pub async fn create(&self, recipe: &mut Recipe) -> Result<(), Error> {
        self.validator.run(recipe, RECIPE_STEPS).await?;
        self.validator.store.create(recipe).await?;
        tracing::debug!(recipe = recipe.id, "created recipe");
        Ok(())
    }

    /// Validate and persist changes to an existing recipe.
    pub async fn update(&self, recipe: &mut Recipe) -> Result<(), Error> {
        self.validator.run(recipe, RECIPE_STEPS).await?;
        Ok(self.validator.store.update(recipe).await?)
    }

    pub async fn by_id(&self, id: i64) -> Result<Recipe, Error> {
        if id <= 0 {
            return Err(Error::InvalidId);
        }
        Ok(self.validator.store.by_id(id).await?)
    }

    /// Every recipe owned by `user_id`, oldest first.
    pub async fn by_user_id(&self, user_id: i64) -> Result<Vec<Recipe>, Error> {
        Ok(self.validator.store.by_user_id(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn service() -> RecipeService<MemoryStore> {
        RecipeService::new(MemoryStore::new())
    }

    fn candidate(user_id: i64, title: &str) -> Recipe {
        Recipe {
            user_id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_an_id() {
        let rs = service();
        let mut recipe = candidate(7, "Carbonara");
        rs.create(&mut recipe).await.unwrap();

        assert!(recipe.id > 0);
        let found = rs.by_id(recipe.id).await.unwrap();
        assert_eq!(found.title, "Carbonara");
    }

    #[tokio::test]
    async fn test_create_requires_an_owner_before_anything_else() {
        let rs = service();
        // The owner check fires first even when the title is also set.
        let mut recipe = candidate(0, "Carbonara");
        let err = rs.create(&mut recipe).await.unwrap_err();
        assert!(matches!(err, Error::UserIdRequired));
    }

    #[tokio::test]
    async fn test_create_requires_a_title() {
        let rs = service();
        let mut recipe = candidate(7, "");
        let err = rs.create(&mut recipe).await.unwrap_err();
        assert!(matches!(err, Error::TitleRequired));
    }

    #[tokio::test]
    async fn test_update_runs_the_chain_too() {
        let rs = service();
        let mut recipe = candidate(7, "Carbonara");
        rs.create(&mut recipe).await.unwrap();

        recipe.title.clear();
        let err = rs.update(&mut recipe).await.unwrap_err();
        assert!(matches!(err, Error::TitleRequired));

        recipe.title = "Cacio e pepe".to_string();
        recipe.description = "Fewer ingredients, more arguments.".to_string();
        rs.update(&mut recipe).await.unwrap();

        let found = rs.by_id(recipe.id).await.unwrap();
        assert_eq!(found.title, "Cacio e pepe");
    }

    #[tokio::test]
    async fn test_by_user_id_filters_by_owner() {
        let rs = service();
        let mut first = candidate(1, "Carbonara");
        let mut second = candidate(2, "Pho");
        rs.create(&mut first).await.unwrap();
        rs.create(&mut second).await.unwrap();

        let owned = rs.by_user_id(1).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].title, "Carbonara");
    }
}

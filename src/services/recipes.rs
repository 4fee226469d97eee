use std::sync::Arc;

use garde::Validate;
use uuid::Uuid;

use crate::{
    crypto::token::Clock,
    error::{AppError, Result},
    models::recipe::{Recipe, RecipeDraft},
    repositories::recipe::RecipeStore,
    services::recipe_cache::RecipeCache,
};

/// Recipe CRUD with cache invalidation on every write.
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    cache: RecipeCache,
    clock: Arc<dyn Clock>,
}

impl RecipeService {
    /// Creates a new `RecipeService`.
    pub fn new(store: Arc<dyn RecipeStore>, cache: RecipeCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            cache,
            clock,
        }
    }

    /// Lists every recipe through the read-through cache.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        self.cache.get_collection().await
    }

    /// Gets a single recipe.
    pub async fn get(&self, id: Uuid) -> Result<Recipe> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Creates a recipe with a fresh id and publication time.
    ///
    /// # Arguments
    ///
    /// * `draft` - The client-supplied fields.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Recipe`.
    pub async fn create(&self, draft: RecipeDraft) -> Result<Recipe> {
        draft.validate()?;

        let recipe = draft.into_recipe(self.clock.now());
        self.store.insert(&recipe).await?;
        self.cache.invalidate().await?;

        tracing::info!("✅ Recipe created: {}", recipe.id);
        Ok(recipe)
    }

    /// Replaces the editable fields of a recipe.
    ///
    /// Nothing is invalidated when the recipe does not exist, because nothing
    /// was written.
    pub async fn update(&self, id: Uuid, draft: RecipeDraft) -> Result<()> {
        draft.validate()?;

        if !self.store.update(id, &draft).await? {
            return Err(AppError::NotFound);
        }
        self.cache.invalidate().await?;

        tracing::info!("✅ Recipe updated: {}", id);
        Ok(())
    }

    /// Deletes a recipe.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        self.cache.invalidate().await?;

        tracing::info!("🗑️ Recipe deleted: {}", id);
        Ok(())
    }

    /// Finds recipes carrying `tag`, ignoring case.
    pub async fn search(&self, tag: &str) -> Result<Vec<Recipe>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(AppError::Validation("Query parameter 'tag' is required".to_string()));
        }

        self.store.search_by_tag(tag).await
    }
}

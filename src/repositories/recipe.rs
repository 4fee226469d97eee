use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::recipe::{Recipe, RecipeDraft},
};

/// The authoritative store for recipe documents.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns every recipe.
    async fn list_all(&self) -> Result<Vec<Recipe>>;

    /// Finds a recipe by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>>;

    /// Stores a new recipe.
    async fn insert(&self, recipe: &Recipe) -> Result<()>;

    /// Replaces the editable fields. Returns `false` when no such recipe exists.
    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<bool>;

    /// Removes a recipe. Returns `false` when no such recipe exists.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Recipes carrying `tag`, compared case-insensitively.
    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>>;
}

/// `RecipeStore` backed by the `recipes` table.
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: Pool,
}

impl PgRecipeStore {
    /// Creates a new `PgRecipeStore`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_all(&self) -> Result<Vec<Recipe>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, name, tags, ingredients, instructions, published_at
                FROM recipes
                ORDER BY published_at ASC, id ASC
                "#,
                &[],
            )
            .await?;
        Ok(rows.iter().map(Recipe::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, name, tags, ingredients, instructions, published_at
                FROM recipes
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(Recipe::from))
    }

    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                INSERT INTO recipes (id, name, tags, ingredients, instructions, published_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
                &[
                    &recipe.id,
                    &recipe.name,
                    &recipe.tags,
                    &recipe.ingredients,
                    &recipe.instructions,
                    &recipe.published_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                r#"
                UPDATE recipes
                SET name = $2, tags = $3, ingredients = $4, instructions = $5
                WHERE id = $1
                "#,
                &[
                    &id,
                    &draft.name,
                    &draft.tags,
                    &draft.ingredients,
                    &draft.instructions,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM recipes WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, name, tags, ingredients, instructions, published_at
                FROM recipes
                WHERE EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE lower(t) = lower($1))
                ORDER BY published_at ASC, id ASC
                "#,
                &[&tag],
            )
            .await?;
        Ok(rows.iter().map(Recipe::from).collect())
    }
}

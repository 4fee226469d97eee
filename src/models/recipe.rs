use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// A recipe document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// The unique identifier for the recipe.
    pub id: Uuid,
    /// The recipe's name.
    pub name: String,
    /// Free-form tags used by search.
    pub tags: Vec<String>,
    /// Ingredient lines.
    pub ingredients: Vec<String>,
    /// Preparation steps, in order.
    pub instructions: Vec<String>,
    /// The timestamp when the recipe was published.
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

impl From<&Row> for Recipe {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            tags: row.get("tags"),
            ingredients: row.get("ingredients"),
            instructions: row.get("instructions"),
            published_at: row.get("published_at"),
        }
    }
}

/// The client-supplied part of a recipe, used for create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeDraft {
    #[garde(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[garde(length(max = 100))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[garde(length(max = 100))]
    pub ingredients: Vec<String>,
    #[serde(default)]
    #[garde(length(max = 100))]
    pub instructions: Vec<String>,
}

impl RecipeDraft {
    /// Turns the draft into a new document with a fresh id.
    pub fn into_recipe(self, published_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: self.name,
            tags: self.tags,
            ingredients: self.ingredients,
            instructions: self.instructions,
            published_at,
        }
    }
}

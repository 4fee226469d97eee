use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::recipe::{Recipe, RecipeDraft},
    state::AppState,
};

/// The query parameters for tag search.
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub tag: String,
}

/// A plain confirmation body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Creates a new recipe.
#[axum::debug_handler]
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<Json<Recipe>> {
    let Json(draft) = payload?;
    let recipe = state.recipes.create(draft).await?;
    Ok(Json(recipe))
}

/// Lists all recipes.
#[axum::debug_handler]
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>> {
    let recipes = state.recipes.list().await?;
    Ok(Json(recipes))
}

/// Gets a recipe by id.
#[axum::debug_handler]
pub async fn get_recipe(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Recipe>> {
    let Path(id) = id?;
    let recipe = state.recipes.get(id).await?;
    Ok(Json(recipe))
}

/// Updates a recipe.
#[axum::debug_handler]
pub async fn update_recipe(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(id) = id?;
    let Json(draft) = payload?;
    state.recipes.update(id, draft).await?;

    Ok(Json(MessageResponse {
        message: "Recipe updated successfully".to_string(),
    }))
}

/// Deletes a recipe.
#[axum::debug_handler]
pub async fn delete_recipe(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(id) = id?;
    state.recipes.delete(id).await?;

    Ok(Json(MessageResponse {
        message: format!("Recipe with id {} deleted", id),
    }))
}

/// Searches recipes by tag.
#[axum::debug_handler]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Recipe>>> {
    let recipes = state.recipes.search(&query.tag).await?;

    if recipes.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(recipes))
}

//! Read-through cache for the full recipe collection.
//!
//! The whole collection is cached as one JSON snapshot under a fixed key.
//! Reads populate it on a miss; every successful write drops it. There is no
//! TTL: absence is the only staleness signal.
//!
//! A read that misses, queries the store and then populates can interleave
//! with a write whose invalidation lands in between. The snapshot then holds
//! pre-write data until the next write. This window is accepted.

use std::sync::Arc;

use crate::error::Result;
use crate::models::recipe::Recipe;
use crate::repositories::cache::SnapshotCache;
use crate::repositories::recipe::RecipeStore;

/// The cache key holding the serialized collection.
pub const RECIPES_CACHE_KEY: &str = "recipes";

/// Serves the recipe collection from the cache, falling back to the store.
#[derive(Clone)]
pub struct RecipeCache {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn SnapshotCache>,
}

impl RecipeCache {
    /// Creates a new `RecipeCache`.
    pub fn new(store: Arc<dyn RecipeStore>, cache: Arc<dyn SnapshotCache>) -> Self {
        Self { store, cache }
    }

    /// Returns every recipe, from the snapshot when one is cached.
    ///
    /// Cache errors and undecodable snapshots count as misses. Only a store
    /// failure fails the call.
    pub async fn get_collection(&self) -> Result<Vec<Recipe>> {
        match self.cache.get(RECIPES_CACHE_KEY).await {
            Ok(Some(payload)) => match sonic_rs::from_str::<Vec<Recipe>>(&payload) {
                Ok(recipes) => {
                    tracing::debug!("⚡ Recipes served from cache ({} items)", recipes.len());
                    return Ok(recipes);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Cached recipes snapshot is unreadable: {}", e);
                }
            },
            Ok(None) => {
                tracing::debug!("Recipes cache miss");
            }
            Err(e) => {
                tracing::warn!("⚠️ Recipes cache unavailable, reading from store: {}", e);
            }
        }

        let recipes = self.store.list_all().await?;

        match sonic_rs::to_string(&recipes) {
            Ok(payload) => {
                if let Err(e) = self.cache.set(RECIPES_CACHE_KEY, &payload).await {
                    tracing::warn!("⚠️ Failed to populate recipes cache: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to serialize recipes snapshot: {}", e);
            }
        }

        Ok(recipes)
    }

    /// Drops the cached snapshot.
    ///
    /// Must run after every successful write to the collection and before
    /// the write is acknowledged.
    pub async fn invalidate(&self) -> Result<()> {
        self.cache.delete(RECIPES_CACHE_KEY).await.map_err(|e| {
            tracing::error!("❌ Failed to invalidate recipes cache after a write: {}", e);
            e
        })?;
        tracing::debug!("🧹 Recipes cache invalidated");
        Ok(())
    }
}

use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::config::Config;
use crate::crypto::token::{Clock, SystemClock, TokenCodec};
use crate::error::Result;
use crate::repositories::cache::{RedisSnapshotCache, SnapshotCache};
use crate::repositories::recipe::{PgRecipeStore, RecipeStore};
use crate::repositories::user::{CredentialStore, PgCredentialStore};
use crate::services::auth::SessionManager;
use crate::services::recipe_cache::RecipeCache;
use crate::services::recipes::RecipeService;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Token verification for the authorization gate.
    pub tokens: TokenCodec,
    /// Sign-in, sign-up and refresh.
    pub sessions: SessionManager,
    /// Recipe CRUD and the cached collection.
    pub recipes: RecipeService,
}

impl AppState {
    /// Connects to PostgreSQL and Redis and builds the state.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        crate::db::ensure_schema(&db).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis Connection Manager initialized");

        Self::with_backends(
            config.clone(),
            Arc::new(PgCredentialStore::new(db.clone())),
            Arc::new(PgRecipeStore::new(db)),
            Arc::new(RedisSnapshotCache::new(redis)),
            Arc::new(SystemClock),
        )
    }

    /// Builds the state over arbitrary store and cache implementations.
    pub fn with_backends(
        config: Config,
        credentials: Arc<dyn CredentialStore>,
        recipe_store: Arc<dyn RecipeStore>,
        cache: Arc<dyn SnapshotCache>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let tokens = TokenCodec::new(config.jwt_secret.clone(), clock.clone())?;
        let sessions = SessionManager::new(credentials, tokens.clone());
        let recipe_cache = RecipeCache::new(recipe_store.clone(), cache);
        let recipes = RecipeService::new(recipe_store, recipe_cache, clock);

        Ok(AppState {
            config,
            tokens,
            sessions,
            recipes,
        })
    }
}

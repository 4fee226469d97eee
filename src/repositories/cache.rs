use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::error::Result;

/// A string key-value cache.
///
/// `get` distinguishes "not cached" (`Ok(None)`) from "cache unavailable"
/// (`Err`).
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Reads a cached payload.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a payload with no expiry.
    async fn set(&self, key: &str, payload: &str) -> Result<()>;

    /// Drops a payload. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// `SnapshotCache` backed by Redis.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    redis: ConnectionManager,
}

impl RedisSnapshotCache {
    /// Creates a new `RedisSnapshotCache`.
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut redis = self.redis.clone();
        let payload: Option<String> = redis.get(key).await?;
        Ok(payload)
    }

    async fn set(&self, key: &str, payload: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.set(key, payload).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(key).await?;
        Ok(())
    }
}

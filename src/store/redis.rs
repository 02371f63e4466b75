//! Redis-backed configuration store.

use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, RedisError};

use crate::store::{ConfigStore, StoreError};

/// Store backed by a single Redis database.
///
/// Each call works on its own clone of the `ConnectionManager`.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a managed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = ::redis::Client::open(redis_url).map_err(backend_error)?;
        let conn = ConnectionManager::new(client).await.map_err(backend_error)?;

        tracing::info!(redis_url = %redis_url, "Connected to Redis");
        Ok(Self { conn })
    }
}

fn backend_error(e: RedisError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl ConfigStore for RedisStore {
    async fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(name).await.map_err(backend_error)?;
        value.ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn set(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(name, content).await.map_err(backend_error)
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(name).await.map_err(backend_error)?;
        if removed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.keys("*").await.map_err(backend_error)
    }
}

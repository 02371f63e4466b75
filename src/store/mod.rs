//! Configuration storage subsystem.
//!
//! # Data Flow
//! ```text
//! workflow (save/delete/get/list)
//!     → ConfigStore trait (get / set / delete / list_keys)
//!     → redis.rs   (production, shared ConnectionManager)
//!     → memory.rs  (tests, local API runs)
//! ```
//!
//! # Design Decisions
//! - Byte-oriented: the store never decodes or validates documents
//! - `set` overwrites unconditionally; existence checks belong to the workflow
//! - Handles are built once and passed explicitly as `Arc<dyn ConfigStore>`

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::settings::{StoreBackend, StoreSettings};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors returned by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document is stored under this name.
    #[error("config name {0} does not exist")]
    NotFound(String),

    /// Transport or backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value surface holding configuration documents by name.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the document stored under `name`.
    async fn get(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `content` under `name`, replacing any existing value.
    async fn set(&self, name: &str, content: &[u8]) -> Result<(), StoreError>;

    /// Remove the document stored under `name`.
    async fn delete(&self, name: &str) -> Result<(), StoreError>;

    /// All stored names, in no particular order.
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Build the configured store backend.
pub async fn connect(settings: &StoreSettings) -> Result<Arc<dyn ConfigStore>, StoreError> {
    match settings.backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&settings.redis_url).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; configurations will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

//! In-process configuration store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{ConfigStore, StoreError};

/// A thread-safe map of configuration name -> document bytes.
///
/// Cloning is cheap and clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.inner
            .get(name)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn set(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        self.inner.insert(name.to_string(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.inner
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.iter().map(|r| r.key().clone()).collect())
    }
}

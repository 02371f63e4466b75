//! Configuration persistence workflow.
//!
//! # Data Flow
//! ```text
//! save:   validate → get(name) ─ NotFound ─→ set → Created
//!                             └─ present ─→ confirm ─ Y → set → Replaced
//!                                                   ├ n → AbortedByOperator
//!                                                   └ 3 misses → Inconclusive
//! create: validate → get(name) ─ NotFound → set → Created
//!                             └─ present → AlreadyExists
//! delete: get(name) ─ NotFound → ConfigNotFound
//!                  └─ present → delete → Deleted
//! ```
//!
//! # Design Decisions
//! - Validation always runs before any store access
//! - Existence is presence-based; an empty stored value still exists
//! - No compare-and-swap: concurrent saves of one name can race between the
//!   existence check and the write
//! - Errors are returned to the interface layer, never rendered here

pub mod confirm;

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::config::loader::{parse_document, ConfigError};
use crate::observability::metrics;
use crate::store::{ConfigStore, StoreError};

pub use self::confirm::{Confirmation, ReplacePrompt};

/// Errors produced by the persistence workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The document could not be decoded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("config name {0} does not exist")]
    ConfigNotFound(String),

    /// Non-interactive save of a name that is already stored.
    #[error("config name {0} already exists")]
    AlreadyExists(String),

    #[error("aborting config replacement")]
    AbortedByOperator,

    #[error(transparent)]
    Backend(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(name) => WorkflowError::ConfigNotFound(name),
            other => WorkflowError::Backend(other),
        }
    }
}

/// Successful result of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No document existed under the name.
    Created,
    /// The operator confirmed overwriting the existing document.
    Replaced,
    /// The operator never gave a decisive answer. Nothing was written.
    Inconclusive,
}

impl SaveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveOutcome::Created => "created",
            SaveOutcome::Replaced => "replaced",
            SaveOutcome::Inconclusive => "inconclusive",
        }
    }
}

/// Entry point for every operation on stored configurations.
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Validate and store `raw` under `name`, asking before replacing an
    /// existing document.
    pub async fn save<R, W>(
        &self,
        name: &str,
        raw: &[u8],
        prompt: &mut ReplacePrompt<R, W>,
    ) -> Result<SaveOutcome, WorkflowError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let result = self.save_inner(name, raw, prompt).await;
        metrics::record_save(&result);
        result
    }

    async fn save_inner<R, W>(
        &self,
        name: &str,
        raw: &[u8],
        prompt: &mut ReplacePrompt<R, W>,
    ) -> Result<SaveOutcome, WorkflowError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.check_document(raw)?;

        if !self.exists(name).await? {
            self.write(name, raw).await?;
            return Ok(SaveOutcome::Created);
        }

        match prompt.confirm(name).await {
            Confirmation::Replace => {
                self.write(name, raw).await?;
                Ok(SaveOutcome::Replaced)
            }
            Confirmation::Abort => Err(WorkflowError::AbortedByOperator),
            Confirmation::Inconclusive => {
                tracing::warn!(config = %name, "No decision on replacing config; left unchanged");
                Ok(SaveOutcome::Inconclusive)
            }
        }
    }

    /// Validate and store `raw` under `name`. Refuses to touch an existing document.
    pub async fn create(&self, name: &str, raw: &[u8]) -> Result<SaveOutcome, WorkflowError> {
        let result: Result<SaveOutcome, WorkflowError> = async {
            self.check_document(raw)?;
            if self.exists(name).await? {
                return Err(WorkflowError::AlreadyExists(name.to_string()));
            }
            self.write(name, raw).await?;
            Ok(SaveOutcome::Created)
        }
        .await;
        metrics::record_save(&result);
        result
    }

    /// Remove the document stored under `name`.
    pub async fn delete(&self, name: &str) -> Result<(), WorkflowError> {
        let result: Result<(), WorkflowError> = async {
            if !self.exists(name).await? {
                return Err(WorkflowError::ConfigNotFound(name.to_string()));
            }
            tracing::info!(config = %name, "Deleting config");
            self.store.delete(name).await?;
            Ok(())
        }
        .await;
        metrics::record_delete(&result);
        result
    }

    /// Fetch the raw document stored under `name`.
    pub async fn get(&self, name: &str) -> Result<Vec<u8>, WorkflowError> {
        Ok(self.store.get(name).await?)
    }

    /// Names of all stored configurations, sorted.
    pub async fn list(&self) -> Result<Vec<String>, WorkflowError> {
        let mut names = self.store.list_keys().await?;
        names.sort();
        Ok(names)
    }

    fn check_document(&self, raw: &[u8]) -> Result<(), WorkflowError> {
        if let Err(e) = parse_document(raw) {
            metrics::record_defects(e.defects().len());
            return Err(e.into());
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, WorkflowError> {
        match self.store.get(name).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(WorkflowError::Backend(e)),
        }
    }

    async fn write(&self, name: &str, raw: &[u8]) -> Result<(), WorkflowError> {
        tracing::info!(config = %name, bytes = raw.len(), "Saving config");
        self.store.set(name, raw).await.map_err(WorkflowError::Backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const VALID: &str = "
name: my-lb
description: d
listeners:
  - name: l1
    protocol: http
    port: 80
backends:
  - name: b1
    port: 8080
";

    fn service() -> (ConfigService, MemoryStore) {
        let store = MemoryStore::new();
        (ConfigService::new(Arc::new(store.clone())), store)
    }

    async fn save_with_input(
        service: &ConfigService,
        raw: &str,
        input: &str,
    ) -> Result<SaveOutcome, WorkflowError> {
        let mut output = Vec::new();
        let mut prompt = ReplacePrompt::new(input.as_bytes(), &mut output);
        service.save("my-lb", raw.as_bytes(), &mut prompt).await
    }

    #[tokio::test]
    async fn test_save_new_config() {
        let (service, store) = service();
        let outcome = save_with_input(&service, VALID, "").await.unwrap();
        assert_eq!(outcome, SaveOutcome::Created);
        assert_eq!(store.get("my-lb").await.unwrap(), VALID.as_bytes());
    }

    #[tokio::test]
    async fn test_invalid_document_never_stored() {
        let (service, store) = service();
        let err = save_with_input(&service, "name: my-lb\n", "Y\n").await.unwrap_err();
        match err {
            WorkflowError::Config(ConfigError::Invalid(defects)) => {
                assert_eq!(defects[0], "missing description of your LB configuration");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_replace_confirmed() {
        let (service, store) = service();
        store.set("my-lb", b"old").await.unwrap();

        let outcome = save_with_input(&service, VALID, "Y\n").await.unwrap();
        assert_eq!(outcome, SaveOutcome::Replaced);
        assert_eq!(store.get("my-lb").await.unwrap(), VALID.as_bytes());
    }

    #[tokio::test]
    async fn test_replace_declined() {
        let (service, store) = service();
        store.set("my-lb", b"old").await.unwrap();

        let err = save_with_input(&service, VALID, "n\n").await.unwrap_err();
        assert!(matches!(err, WorkflowError::AbortedByOperator));
        assert_eq!(store.get("my-lb").await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_replace_inconclusive() {
        let (service, store) = service();
        store.set("my-lb", b"old").await.unwrap();

        let outcome = save_with_input(&service, VALID, "sure\nok\nfine\n").await.unwrap();
        assert_eq!(outcome, SaveOutcome::Inconclusive);
        assert_eq!(store.get("my-lb").await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_create_refuses_existing() {
        let (service, store) = service();
        assert_eq!(service.create("my-lb", VALID.as_bytes()).await.unwrap(), SaveOutcome::Created);

        let err = service.create("my-lb", VALID.as_bytes()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyExists(ref name) if name == "my-lb"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, store) = service();
        store.set("my-lb", VALID.as_bytes()).await.unwrap();

        service.delete("my-lb").await.unwrap();
        assert!(store.is_empty());

        let err = service.delete("my-lb").await.unwrap_err();
        assert_eq!(err.to_string(), "config name my-lb does not exist");
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let (service, store) = service();
        store.set("zeta", b"z").await.unwrap();
        store.set("alpha", b"a").await.unwrap();

        assert_eq!(service.list().await.unwrap(), vec!["alpha", "zeta"]);
        assert_eq!(service.get("alpha").await.unwrap(), b"a");
        assert!(matches!(service.get("nope").await, Err(WorkflowError::ConfigNotFound(_))));
    }
}

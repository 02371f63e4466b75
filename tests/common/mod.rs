//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lbx::config::settings::ApiSettings;
use lbx::lifecycle::Shutdown;
use lbx::store::{ConfigStore, MemoryStore, StoreError};
use lbx::workflow::ConfigService;
use lbx::HttpServer;

pub const VALID_CONFIG: &str = "
name: my-lb
description: Testing ts

listeners:
  - name: my-http
    protocol: http
    port: 80

backends:
  - name: backend1
    port: 8080
  - name: backend2
    port: 8080
";

/// Start the API on an ephemeral port backed by `store`.
///
/// Returns the base URL and the shutdown handle keeping the server alive.
pub async fn start_api(store: MemoryStore) -> (String, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ApiSettings::default(), ConfigService::new(Arc::new(store)));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    (format!("http://{}", addr), shutdown)
}

/// Store wrapper counting calls, optionally failing every operation.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail: bool,
}

impl CountingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Backend("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for CountingStore {
    async fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(name).await
    }

    async fn set(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.set(name, content).await
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.delete(name).await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        self.inner.list_keys().await
    }
}

//! Shared fixtures for unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::cache::{Cache, CacheError, Result as CacheResult};
use crate::storage::{CountOracle, Entity, Result};

/// Entity with an integer id; `0` means not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i32,
    pub name: String,
}

impl Member {
    pub fn persisted(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }

    pub fn transient(name: &str) -> Self {
        Self::persisted(0, name)
    }
}

impl Entity for Member {
    type Id = i32;
    const TYPE_NAME: &'static str = "Member";

    fn id(&self) -> i32 {
        self.id
    }

    fn has_identity(&self) -> bool {
        self.id > 0
    }
}

/// Entity keyed by a string; an empty code means not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub iso_code: String,
}

impl Entity for Language {
    type Id = String;
    const TYPE_NAME: &'static str = "Language";

    fn id(&self) -> String {
        self.iso_code.clone()
    }

    fn has_identity(&self) -> bool {
        !self.iso_code.is_empty()
    }
}

/// Ordered in-memory cache that counts calls and can be told to fail.
#[derive(Default)]
pub struct MockCache {
    store: RwLock<BTreeMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    fail_sets: AtomicBool,
    fail_reads: AtomicBool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_raw(&self, key: &str, value: &[u8]) {
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.store.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys().cloned().collect()
    }

    /// Number of `set` and `delete` calls seen so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> CacheResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("mock read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.check_reads()?;
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CacheError::OperationFailed("mock set failure".to_string()));
        }
        self.insert_raw(key, value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> CacheResult<Vec<(String, Vec<u8>)>> {
        self.check_reads()?;
        Ok(self
            .store
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// Count oracle returning a fixed total and counting its calls.
pub struct FixedCount {
    pub total: usize,
    pub calls: AtomicUsize,
}

impl FixedCount {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CountOracle for FixedCount {
    async fn total_count(&self) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.total)
    }
}

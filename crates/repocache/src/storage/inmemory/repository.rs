//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use repocache_core::storage::{Entity, EntityRepository, RepositoryError, Result};

/// Entity whose identity is an integer assigned by the store.
pub trait Sequenced: Entity<Id = i32> {
    /// Stores the identity assigned on first save.
    fn assign_id(&mut self, id: i32);

    /// Checks the entity before it is written.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

#[derive(Debug)]
struct Table<E> {
    rows: BTreeMap<i32, E>,
    next_id: i32,
}

/// In-memory storage backend.
///
/// Uses a `BTreeMap` wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<E> {
    table: Arc<RwLock<Table<E>>>,
}

impl<E: Sequenced> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Sequenced> InMemoryRepository<E> {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

#[async_trait]
impl<E: Sequenced> EntityRepository<E> for InMemoryRepository<E> {
    async fn get(&self, id: i32) -> Result<Option<E>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[i32]) -> Result<Vec<E>> {
        let table = self.table.read().await;
        if ids.is_empty() {
            return Ok(table.rows.values().cloned().collect());
        }
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let table = self.table.read().await;
        Ok(table.rows.contains_key(&id))
    }

    async fn save(&self, entity: &E) -> Result<E> {
        entity.validate().map_err(RepositoryError::InvalidData)?;

        let mut table = self.table.write().await;
        let mut saved = entity.clone();

        if entity.has_identity() {
            if !table.rows.contains_key(&entity.id()) {
                return Err(RepositoryError::NotFound {
                    entity_type: E::TYPE_NAME,
                    id: entity.id().to_string(),
                });
            }
        } else {
            let id = table.next_id;
            table.next_id += 1;
            saved.assign_id(id);
        }

        table.rows.insert(saved.id(), saved.clone());
        Ok(saved)
    }

    async fn delete(&self, entity: &E) -> Result<()> {
        let mut table = self.table.write().await;
        if table.rows.remove(&entity.id()).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: E::TYPE_NAME,
                id: entity.id().to_string(),
            });
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let table = self.table.read().await;
        Ok(table.rows.len())
    }
}

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::Result;

/// A persisted domain object that can be cached by id.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Identity type. Its `Display` form is appended to the type key.
    type Id: Clone + Display + Send + Sync + 'static;

    /// Name of the entity type, unique among cached types.
    const TYPE_NAME: &'static str;

    /// Returns the entity id. Meaningless while `has_identity` is false.
    fn id(&self) -> Self::Id;

    /// Returns true once the entity has been assigned a real key.
    fn has_identity(&self) -> bool;
}

/// Repository for a single entity type.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Gets an entity by its ID.
    async fn get(&self, id: E::Id) -> Result<Option<E>>;

    /// Gets the entities with the given IDs, or every entity when `ids` is empty.
    async fn get_many(&self, ids: &[E::Id]) -> Result<Vec<E>>;

    /// Returns true if an entity with the given ID exists.
    async fn exists(&self, id: E::Id) -> Result<bool>;

    /// Creates or updates an entity, returning the persisted copy.
    ///
    /// A transient entity comes back with its identity assigned.
    async fn save(&self, entity: &E) -> Result<E>;

    /// Deletes an entity.
    async fn delete(&self, entity: &E) -> Result<()>;

    /// Counts all entities of this type.
    async fn count(&self) -> Result<usize>;
}

/// Authoritative total count of one entity type.
#[async_trait]
pub trait CountOracle: Send + Sync {
    async fn total_count(&self) -> Result<usize>;
}

/// [`CountOracle`] backed by a repository's `count`.
pub struct RepositoryCount<R, E> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<R, E> RepositoryCount<R, E>
where
    R: EntityRepository<E>,
    E: Entity,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<R, E> CountOracle for RepositoryCount<R, E>
where
    R: EntityRepository<E>,
    E: Entity,
{
    async fn total_count(&self) -> Result<usize> {
        self.repository.count().await
    }
}

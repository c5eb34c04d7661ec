//! Cached repository decorator over any `EntityRepository`.

use std::sync::Arc;

use async_trait::async_trait;

use repocache_core::cache::Cache;
use repocache_core::policy::{CachePolicyOptions, RepositoryCachePolicy};
use repocache_core::storage::{Entity, EntityRepository, RepositoryCount, Result};

/// Cached repository decorator.
///
/// Routes every call through a [`RepositoryCachePolicy`] and commits the
/// scheduled cache mutation before returning:
/// - **Reads**: Check cache first, on miss fetch from repository and populate cache
/// - **Writes**: Persist to repository, then cache the persisted entity or invalidate
///
/// The wrapped repository doubles as the count oracle, so
/// `validate_all_cache_count` works without extra wiring.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedRepository<E, R, C>
where
    E: Entity,
    R: EntityRepository<E>,
    C: Cache,
{
    repository: Arc<R>,
    policy: RepositoryCachePolicy<E, C>,
}

impl<E, R, C> CachedRepository<E, R, C>
where
    E: Entity,
    R: EntityRepository<E> + 'static,
    C: Cache,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `options` - Policy options, TTL included
    pub fn new(repository: Arc<R>, cache: Arc<C>, options: CachePolicyOptions) -> Self {
        let oracle = Arc::new(RepositoryCount::new(repository.clone()));
        let policy = RepositoryCachePolicy::new(cache, options).with_count_oracle(oracle);
        Self { repository, policy }
    }
}

#[async_trait]
impl<E, R, C> EntityRepository<E> for CachedRepository<E, R, C>
where
    E: Entity,
    R: EntityRepository<E> + 'static,
    C: Cache + 'static,
{
    async fn get(&self, id: E::Id) -> Result<Option<E>> {
        let outcome = self.policy.get(id, |id| self.repository.get(id)).await;
        Ok(outcome.commit().await?)
    }

    async fn get_many(&self, ids: &[E::Id]) -> Result<Vec<E>> {
        let outcome = self
            .policy
            .get_all(ids, |ids| async move { self.repository.get_many(&ids).await })
            .await;
        Ok(outcome.commit().await?)
    }

    async fn exists(&self, id: E::Id) -> Result<bool> {
        Ok(self
            .policy
            .exists(id, |id| self.repository.exists(id))
            .await?)
    }

    async fn save(&self, entity: &E) -> Result<E> {
        let outcome = self
            .policy
            .create_or_update(entity, self.repository.save(entity))
            .await;
        let saved = outcome.commit().await?;

        tracing::debug!(
            entity_type = E::TYPE_NAME,
            id = %saved.id(),
            "Entity saved"
        );
        Ok(saved)
    }

    async fn delete(&self, entity: &E) -> Result<()> {
        let outcome = self
            .policy
            .remove(entity, self.repository.delete(entity))
            .await;
        outcome.commit().await?;

        tracing::debug!(
            entity_type = E::TYPE_NAME,
            id = %entity.id(),
            "Entity deleted"
        );
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        // Counts are never cached.
        self.repository.count().await
    }
}

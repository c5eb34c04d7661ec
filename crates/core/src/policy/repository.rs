//! Default repository cache policy.
//!
//! Reads check the cache first and fall back to the repository. Writes go to
//! the repository first; the matching cache mutation is scheduled and only
//! applied when the returned [`Pending`] is committed.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::cache::{
    deserialize_entity, is_zero_count_marker, item_key, type_key, Cache, CacheAction, CommitScope,
};
use crate::storage::{CountOracle, Entity, Result as RepositoryResult};

use super::{AllCacheStrategy, CachePolicyOptions, Pending, PolicyError, PrefixScan, Result};

/// Cache policy for one entity type.
///
/// # Type Parameters
///
/// * `E` - The cached entity type
/// * `C` - The cache implementation
/// * `S` - The strategy used to read "all entities" from the cache
pub struct RepositoryCachePolicy<E, C, S = PrefixScan>
where
    E: Entity,
    C: Cache + ?Sized,
    S: AllCacheStrategy<E>,
{
    cache: Arc<C>,
    options: CachePolicyOptions,
    count_oracle: Option<Arc<dyn CountOracle>>,
    strategy: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C> RepositoryCachePolicy<E, C>
where
    E: Entity,
    C: Cache + ?Sized,
{
    /// Creates a policy that reads cached "all" results by prefix scan.
    pub fn new(cache: Arc<C>, options: CachePolicyOptions) -> Self {
        Self {
            cache,
            options,
            count_oracle: None,
            strategy: PrefixScan,
            _entity: PhantomData,
        }
    }
}

impl<E, C, S> RepositoryCachePolicy<E, C, S>
where
    E: Entity,
    C: Cache + ?Sized,
    S: AllCacheStrategy<E>,
{
    /// Sets the count oracle used by `validate_all_cache_count`.
    pub fn with_count_oracle(mut self, oracle: Arc<dyn CountOracle>) -> Self {
        self.count_oracle = Some(oracle);
        self
    }

    /// Replaces the strategy used to read "all entities" from the cache.
    pub fn with_strategy<T>(self, strategy: T) -> RepositoryCachePolicy<E, C, T>
    where
        T: AllCacheStrategy<E>,
    {
        RepositoryCachePolicy {
            cache: self.cache,
            options: self.options,
            count_oracle: self.count_oracle,
            strategy,
            _entity: PhantomData,
        }
    }

    pub fn options(&self) -> &CachePolicyOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Persists `entity` and schedules caching of the persisted copy.
    ///
    /// `persist` yields the persisted entity, which may carry a newly
    /// assigned identity. On success the persisted entity is scheduled for
    /// its item key and the type key is scheduled for removal. On failure
    /// both keys are scheduled for removal and the original error is
    /// returned.
    pub async fn create_or_update<P>(&self, entity: &E, persist: P) -> Pending<'_, E, E, C>
    where
        P: Future<Output = RepositoryResult<E>> + Send,
    {
        let mut scope = CommitScope::new();

        let result = match persist.await {
            Ok(persisted) => {
                let mut action = self.action();
                if let Some(key) = identity_key(&persisted) {
                    action = action.store(key, persisted.clone());
                }
                // Membership may have changed, drop any "all" or zero-count entry.
                scope.schedule(action.clear(type_key::<E>()));
                Ok(persisted)
            }
            Err(err) => {
                tracing::debug!(
                    entity_type = E::TYPE_NAME,
                    error = %err,
                    "Persist failed, scheduling cache invalidation"
                );
                let mut action = self.action();
                if let Some(key) = identity_key(entity) {
                    action = action.clear(key);
                }
                scope.schedule(action.clear(type_key::<E>()));
                Err(PolicyError::Repository(err))
            }
        };

        self.pending(scope, result)
    }

    /// Deletes `entity` and schedules removal of its item key and the type key.
    ///
    /// Nothing is scheduled when `persist` fails.
    pub async fn remove<P>(&self, entity: &E, persist: P) -> Pending<'_, (), E, C>
    where
        P: Future<Output = RepositoryResult<()>> + Send,
    {
        let mut scope = CommitScope::new();

        let key = match item_key::<E>(&entity.id()) {
            Ok(key) => key,
            Err(err) => return self.pending(scope, Err(err.into())),
        };

        let result = match persist.await {
            Ok(()) => {
                scope.schedule(self.action().clear(key).clear(type_key::<E>()));
                Ok(())
            }
            Err(err) => Err(PolicyError::Repository(err)),
        };

        self.pending(scope, result)
    }

    /// Gets an entity from the cache, falling back to `fetch` on a miss.
    ///
    /// A fetched entity with identity is scheduled for caching. Absence is
    /// never cached.
    pub async fn get<F, Fut>(&self, id: E::Id, fetch: F) -> Pending<'_, Option<E>, E, C>
    where
        F: FnOnce(E::Id) -> Fut + Send,
        Fut: Future<Output = RepositoryResult<Option<E>>> + Send,
    {
        let mut scope = CommitScope::new();

        let key = match item_key::<E>(&id) {
            Ok(key) => key,
            Err(err) => return self.pending(scope, Err(err.into())),
        };

        if let Some(entity) = self.read_entity(&key).await {
            tracing::trace!(%key, "Cache hit for entity");
            return self.pending(scope, Ok(Some(entity)));
        }

        tracing::trace!(%key, "Cache miss for entity");
        let result = fetch(id).await.map_err(PolicyError::from);

        if let Ok(Some(entity)) = &result {
            if entity.has_identity() {
                scope.schedule(self.action().store(key, entity.clone()));
            }
        }

        self.pending(scope, result)
    }

    /// Gets an entity from the cache only.
    pub async fn get_cached(&self, id: &E::Id) -> Result<Option<E>> {
        let key = item_key::<E>(id)?;
        Ok(self.read_entity(&key).await)
    }

    /// Returns true if the entity is cached, otherwise asks `fetch`.
    ///
    /// Existence answers are not cached.
    pub async fn exists<F, Fut>(&self, id: E::Id, fetch: F) -> Result<bool>
    where
        F: FnOnce(E::Id) -> Fut + Send,
        Fut: Future<Output = RepositoryResult<bool>> + Send,
    {
        let key = item_key::<E>(&id)?;
        if self.read_entity(&key).await.is_some() {
            return Ok(true);
        }
        Ok(fetch(id).await?)
    }

    /// Gets the entities with the given ids, or all entities when `ids` is
    /// empty.
    ///
    /// Specific ids are served from the cache only when every one of them is
    /// cached. "All" is served from the cache when the strategy finds cached
    /// entities (and, with count validation, their number matches the
    /// oracle), or when the zero-count marker is present. Otherwise `fetch`
    /// receives the full id list and its non-`None` results are returned and
    /// scheduled for caching.
    pub async fn get_all<F, Fut, I, T>(&self, ids: &[E::Id], fetch: F) -> Pending<'_, Vec<E>, E, C>
    where
        F: FnOnce(Vec<E::Id>) -> Fut + Send,
        Fut: Future<Output = RepositoryResult<I>> + Send,
        I: IntoIterator<Item = T>,
        T: Into<Option<E>>,
    {
        let mut scope = CommitScope::new();
        let fetch_all = ids.is_empty();

        let cached = if fetch_all {
            self.read_all().await
        } else {
            self.read_many(ids).await
        };
        match cached {
            Ok(Some(entities)) => return self.pending(scope, Ok(entities)),
            Ok(None) => {}
            Err(err) => return self.pending(scope, Err(err)),
        }

        let entities: Vec<E> = match fetch(ids.to_vec()).await {
            Ok(fetched) => fetched
                .into_iter()
                .filter_map(Into::<Option<E>>::into)
                .collect(),
            Err(err) => return self.pending(scope, Err(PolicyError::Repository(err))),
        };

        tracing::trace!(
            entity_type = E::TYPE_NAME,
            requested = ids.len(),
            fetched = entities.len(),
            "Fetched entities from repository"
        );
        scope.schedule(self.collection_action(fetch_all, &entities));

        self.pending(scope, Ok(entities))
    }

    fn action(&self) -> CacheAction<E> {
        CacheAction::new(self.options.ttl)
    }

    fn pending<T>(&self, scope: CommitScope<E>, result: Result<T>) -> Pending<'_, T, E, C> {
        Pending::new(self.cache.as_ref(), scope, result)
    }

    fn collection_action(&self, fetch_all: bool, entities: &[E]) -> CacheAction<E> {
        let action = self.action();

        // A lookup of specific ids says nothing about "all", so only an
        // empty "all" result becomes a zero-count marker.
        if fetch_all && entities.is_empty() && self.options.allow_zero_count_cache {
            return action.store_zero_count(type_key::<E>());
        }

        entities.iter().fold(action, |action, entity| {
            match identity_key(entity) {
                Some(key) => action.store(key, entity.clone()),
                None => action,
            }
        })
    }

    async fn read_entity(&self, key: &str) -> Option<E> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_entity(&bytes) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    // Deserialization failed - treat as cache miss
                    tracing::warn!(%key, error = %err, "Cached entity deserialization failed");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn read_many(&self, ids: &[E::Id]) -> Result<Option<Vec<E>>> {
        let keys = ids
            .iter()
            .map(item_key::<E>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut entities = Vec::with_capacity(keys.len());
        for key in &keys {
            match self.read_entity(key).await {
                Some(entity) => entities.push(entity),
                None => {
                    tracing::trace!(%key, requested = keys.len(), "Partial cache hit for entities");
                    return Ok(None);
                }
            }
        }

        tracing::trace!(entity_type = E::TYPE_NAME, count = entities.len(), "Cache hit for entities");
        Ok(Some(entities))
    }

    async fn read_all(&self) -> Result<Option<Vec<E>>> {
        let oracle = match (&self.count_oracle, self.options.validate_all_cache_count) {
            (_, false) => None,
            (Some(oracle), true) => Some(oracle),
            (None, true) => {
                return Err(PolicyError::InvalidArgument(format!(
                    "count validation is enabled for {} but no count oracle is set",
                    E::TYPE_NAME
                )));
            }
        };

        let entities = self.strategy.load_all_from_cache(self.cache.as_ref()).await;

        if !entities.is_empty() {
            let Some(oracle) = oracle else {
                tracing::trace!(entity_type = E::TYPE_NAME, count = entities.len(), "Cache hit for all entities");
                return Ok(Some(entities));
            };

            let total = oracle.total_count().await?;
            if entities.len() == total {
                tracing::trace!(entity_type = E::TYPE_NAME, count = total, "Cache hit for all entities");
                return Ok(Some(entities));
            }

            tracing::debug!(
                entity_type = E::TYPE_NAME,
                cached = entities.len(),
                total,
                "Cached entity count is stale"
            );
            return Ok(None);
        }

        if self.options.allow_zero_count_cache && self.has_zero_count_marker().await {
            tracing::trace!(entity_type = E::TYPE_NAME, "Cache hit for zero-count marker");
            return Ok(Some(Vec::new()));
        }

        Ok(None)
    }

    async fn has_zero_count_marker(&self) -> bool {
        let key = type_key::<E>();
        match self.cache.get(&key).await {
            Ok(Some(bytes)) => is_zero_count_marker(&bytes),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(%key, error = %err, "Cache read failed");
                false
            }
        }
    }
}

/// Item key of an entity that has identity.
fn identity_key<E: Entity>(entity: &E) -> Option<String> {
    if !entity.has_identity() {
        return None;
    }
    match item_key::<E>(&entity.id()) {
        Ok(key) => Some(key),
        Err(err) => {
            tracing::warn!(error = %err, "Entity has identity but no usable cache key");
            None
        }
    }
}

//! Deferred cache mutations.
//!
//! A [`CacheAction`] describes the cache writes and invalidations an
//! operation wants applied once it has finished. A [`CommitScope`] holds at
//! most one such action and applies it exactly once when discharged.

use std::time::Duration;

use super::{serialize_entity, Cache, ZERO_COUNT_MARKER};

/// A single step of a [`CacheAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStep<E> {
    /// Serialize `entity` and store it under `key`.
    Store { key: String, entity: E },
    /// Store the zero-count marker under `key`.
    StoreZeroCount { key: String },
    /// Remove `key` from the cache.
    Clear { key: String },
}

/// An ordered list of cache mutations, applied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheAction<E> {
    steps: Vec<CacheStep<E>>,
    ttl: Option<Duration>,
}

impl<E> CacheAction<E> {
    /// Creates an empty action whose writes use `ttl`.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            steps: Vec::new(),
            ttl,
        }
    }

    /// Appends a write of `entity` under `key`.
    pub fn store(mut self, key: impl Into<String>, entity: E) -> Self {
        self.steps.push(CacheStep::Store {
            key: key.into(),
            entity,
        });
        self
    }

    /// Appends a write of the zero-count marker under `key`.
    pub fn store_zero_count(mut self, key: impl Into<String>) -> Self {
        self.steps.push(CacheStep::StoreZeroCount { key: key.into() });
        self
    }

    /// Appends a removal of `key`.
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.steps.push(CacheStep::Clear { key: key.into() });
        self
    }

    /// Returns the steps in application order.
    pub fn steps(&self) -> &[CacheStep<E>] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<E: serde::Serialize> CacheAction<E> {
    /// Applies every step against `cache`.
    ///
    /// A failing step is logged and skipped; the remaining steps still run.
    pub async fn apply<C>(self, cache: &C)
    where
        C: Cache + ?Sized,
    {
        let CacheAction { steps, ttl } = self;

        for step in steps {
            match step {
                CacheStep::Store { key, entity } => match serialize_entity(&entity) {
                    Ok(bytes) => {
                        if let Err(err) = cache.set(&key, &bytes, ttl).await {
                            tracing::warn!(%key, error = %err, "Failed to cache entity");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%key, error = %err, "Entity serialization failed");
                    }
                },
                CacheStep::StoreZeroCount { key } => {
                    if let Err(err) = cache.set(&key, ZERO_COUNT_MARKER, ttl).await {
                        tracing::warn!(%key, error = %err, "Failed to cache zero-count marker");
                    }
                }
                CacheStep::Clear { key } => {
                    if let Err(err) = cache.delete(&key).await {
                        tracing::warn!(%key, error = %err, "Failed to invalidate cache key");
                    }
                }
            }
        }
    }
}

/// Holds the cache mutation of one operation until the operation ends.
///
/// Scheduling replaces any earlier action. Discharging consumes the scope,
/// so the scheduled action runs at most once.
#[derive(Debug)]
pub struct CommitScope<E> {
    action: Option<CacheAction<E>>,
}

impl<E> Default for CommitScope<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CommitScope<E> {
    /// Creates an idle scope.
    pub fn new() -> Self {
        Self { action: None }
    }

    /// Schedules `action`, replacing any previously scheduled one.
    pub fn schedule(&mut self, action: CacheAction<E>) {
        if self.action.is_some() {
            tracing::trace!("Replacing previously scheduled cache action");
        }
        self.action = Some(action);
    }

    /// Returns true if an action is waiting to be discharged.
    pub fn is_scheduled(&self) -> bool {
        self.action.is_some()
    }

    /// Returns the scheduled action without running it.
    pub fn pending(&self) -> Option<&CacheAction<E>> {
        self.action.as_ref()
    }

    /// Removes and returns the scheduled action, leaving the scope idle.
    pub fn take(&mut self) -> Option<CacheAction<E>> {
        self.action.take()
    }
}

impl<E: serde::Serialize> CommitScope<E> {
    /// Applies the scheduled action, if any.
    pub async fn discharge<C>(mut self, cache: &C)
    where
        C: Cache + ?Sized,
    {
        if let Some(action) = self.take() {
            tracing::debug!(steps = action.steps().len(), "Discharging cache action");
            action.apply(cache).await;
        }
    }
}

use crate::cache::{Cache, CommitScope};
use crate::storage::Entity;

use super::Result;

/// Outcome of a policy operation whose cache mutation is still pending.
///
/// The operation's result is held back until [`Pending::commit`] has
/// discharged the scheduled cache action. Commit on every path, success or
/// failure, before handing the result on.
#[must_use = "the scheduled cache mutation only runs when the outcome is committed"]
pub struct Pending<'a, T, E, C>
where
    E: Entity,
    C: Cache + ?Sized,
{
    result: Result<T>,
    scope: CommitScope<E>,
    cache: &'a C,
}

impl<'a, T, E, C> Pending<'a, T, E, C>
where
    E: Entity,
    C: Cache + ?Sized,
{
    pub(crate) fn new(cache: &'a C, scope: CommitScope<E>, result: Result<T>) -> Self {
        Self {
            result,
            scope,
            cache,
        }
    }

    /// Discharges the scheduled cache action, then returns the result.
    pub async fn commit(self) -> Result<T> {
        self.scope.discharge(self.cache).await;
        self.result
    }

    /// Returns the operation result without discharging.
    pub fn result(&self) -> &Result<T> {
        &self.result
    }

    /// Returns the commit scope without discharging.
    pub fn scope(&self) -> &CommitScope<E> {
        &self.scope
    }

    /// Splits into result and scope for callers that discharge themselves.
    pub fn into_parts(self) -> (Result<T>, CommitScope<E>) {
        (self.result, self.scope)
    }
}

//! Repository cache policy.
//!
//! Sits between a repository and a generic [`cache::Cache`] store and decides
//! when entities enter or leave the cache. Cache mutations are never applied
//! inline: every operation schedules them into a [`cache::CommitScope`] that
//! is discharged once the operation has finished, so a failing persistence
//! step can replace a pending write with an invalidation.

pub mod cache;
pub mod policy;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

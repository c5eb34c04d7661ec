//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository trait
//! defined in `repocache_core::storage`, plus the cached decorator that
//! routes any repository through the cache policy.

pub mod cached;
pub mod inmemory;

pub use cached::CachedRepository;
pub use inmemory::InMemoryRepository;

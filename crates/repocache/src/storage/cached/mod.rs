//! Cached repository decorator.
//!
//! This module provides a decorator that wraps any `EntityRepository` with
//! the repository cache policy:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and schedule caching
//! - **Writes**: Persist to repository, then cache or invalidate once the write is done
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(InMemoryRepository::<Domain>::new());
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedRepository::new(repo, cache, CachePolicyOptions::new());
//! ```

mod repository;

pub use repository::CachedRepository;

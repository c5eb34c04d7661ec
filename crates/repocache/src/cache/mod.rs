//! Cache backend implementations.
//!
//! This module provides concrete implementations of the cache trait
//! defined in `repocache_core::cache`.

pub mod memory;

pub use memory::MemoryCache;

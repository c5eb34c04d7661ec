//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the repository trait
//! that stores entities in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. Data is
//! not persisted, which makes it useful for tests and the demo binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use repocache::storage::inmemory::InMemoryRepository;
//!
//! let repo: InMemoryRepository<Domain> = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::{InMemoryRepository, Sequenced};

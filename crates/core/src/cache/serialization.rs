//! Pure functions for serializing/deserializing entities to/from cache bytes.
//!
//! These functions use JSON serialization for cache storage, providing human-readable
//! cache values that are easy to debug and inspect.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Cached value marking "all entities were queried and none exist".
///
/// Stored under the type key, which no item key ever equals.
pub const ZERO_COUNT_MARKER: &[u8] = b"[]";

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes an entity to JSON bytes.
pub fn serialize_entity<E: Serialize>(entity: &E) -> Result<Vec<u8>> {
    serde_json::to_vec(entity).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to an entity.
pub fn deserialize_entity<E: DeserializeOwned>(bytes: &[u8]) -> Result<E> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Returns true if `bytes` decode to an empty JSON array.
pub fn is_zero_count_marker(bytes: &[u8]) -> bool {
    serde_json::from_slice::<Vec<serde_json::Value>>(bytes).is_ok_and(|items| items.is_empty())
}

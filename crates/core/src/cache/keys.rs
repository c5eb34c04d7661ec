use thiserror::Error;

use crate::storage::Entity;

/// Namespace shared by every repository cache key.
pub const REPOSITORY_KEY_PREFIX: &str = "uRepo_";

/// Errors that can occur when deriving a cache key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{entity_type} id is empty and cannot form a cache key")]
    EmptyId { entity_type: &'static str },
}

/// Returns the cache key shared by all items of an entity type.
///
/// The type key doubles as the prefix of every item key of that type and as
/// the slot for the zero-count marker.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(type_key::<Domain>(), "uRepo_Domain_");
/// ```
pub fn type_key<E: Entity>() -> String {
    format!("{}{}_", REPOSITORY_KEY_PREFIX, E::TYPE_NAME)
}

/// Returns the cache key for a single entity.
///
/// Fails when the id renders to an empty string, since such a key would
/// collide with the type key.
pub fn item_key<E: Entity>(id: &E::Id) -> Result<String, KeyError> {
    let id = id.to_string();
    if id.is_empty() {
        return Err(KeyError::EmptyId {
            entity_type: E::TYPE_NAME,
        });
    }
    Ok(format!("{}{}", type_key::<E>(), id))
}

/// Checks if a cache key is an item key of entity type `E`.
///
/// The type key itself is not an item key.
pub fn is_item_key<E: Entity>(key: &str) -> bool {
    key.strip_prefix(&type_key::<E>())
        .is_some_and(|rest| !rest.is_empty())
}

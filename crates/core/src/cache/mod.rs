mod commit;
mod error;
mod keys;
mod serialization;
mod traits;

pub use commit::{CacheAction, CacheStep, CommitScope};
pub use error::{CacheError, Result};
pub use keys::{is_item_key, item_key, type_key, KeyError, REPOSITORY_KEY_PREFIX};
pub use serialization::{
    deserialize_entity, is_zero_count_marker, serialize_entity, SerializationError,
    ZERO_COUNT_MARKER,
};
pub use traits::Cache;

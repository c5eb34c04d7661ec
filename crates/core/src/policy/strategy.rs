use async_trait::async_trait;

use crate::cache::{deserialize_entity, is_item_key, type_key, Cache};
use crate::storage::Entity;

/// Strategy for reading "all entities of a type" out of the cache.
#[async_trait]
pub trait AllCacheStrategy<E: Entity>: Send + Sync {
    /// Returns every cached entity of type `E`. An empty vector means the
    /// cache holds nothing usable.
    async fn load_all_from_cache<C>(&self, cache: &C) -> Vec<E>
    where
        C: Cache + ?Sized;
}

/// Scans every item key under the type key.
///
/// The zero-count marker and values that fail to deserialize are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixScan;

#[async_trait]
impl<E: Entity> AllCacheStrategy<E> for PrefixScan {
    async fn load_all_from_cache<C>(&self, cache: &C) -> Vec<E>
    where
        C: Cache + ?Sized,
    {
        let prefix = type_key::<E>();

        let entries = match cache.get_by_prefix(&prefix).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%prefix, error = %err, "Cache prefix scan failed");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|(key, _)| is_item_key::<E>(key))
            .filter_map(|(key, bytes)| match deserialize_entity::<E>(&bytes) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Cached entity deserialization failed");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{serialize_entity, ZERO_COUNT_MARKER};
    use crate::test_support::{Language, Member, MockCache};

    #[tokio::test]
    async fn test_prefix_scan_returns_items_of_type() {
        let cache = MockCache::new();
        for member in [Member::persisted(1, "ada"), Member::persisted(2, "grace")] {
            let key = format!("uRepo_Member_{}", member.id);
            cache
                .insert_raw(&key, &serialize_entity(&member).unwrap())
                .await;
        }
        let language = Language {
            iso_code: "en-US".to_string(),
        };
        cache
            .insert_raw("uRepo_Language_en-US", &serialize_entity(&language).unwrap())
            .await;

        let members: Vec<Member> = PrefixScan.load_all_from_cache(&cache).await;

        assert_eq!(
            members,
            vec![Member::persisted(1, "ada"), Member::persisted(2, "grace")]
        );
    }

    #[tokio::test]
    async fn test_prefix_scan_skips_marker_and_garbage() {
        let cache = MockCache::new();
        cache.insert_raw("uRepo_Member_", ZERO_COUNT_MARKER).await;
        cache.insert_raw("uRepo_Member_9", b"{broken").await;

        let members: Vec<Member> = PrefixScan.load_all_from_cache(&cache).await;

        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_scan_read_failure_is_empty() {
        let cache = MockCache::new();
        cache
            .insert_raw(
                "uRepo_Member_1",
                &serialize_entity(&Member::persisted(1, "ada")).unwrap(),
            )
            .await;
        cache.fail_reads(true);

        let members: Vec<Member> = PrefixScan.load_all_from_cache(&cache).await;

        assert!(members.is_empty());
    }
}

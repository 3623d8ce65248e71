use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory TTL cache for slow-changing lookups (genre table, movie
/// details). Entries expire after the configured TTL; an expired entry is
/// evicted on the next read of its key.
pub struct TtlCache<K, V> {
    entries: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        // The shard guard is released above; removing here cannot deadlock.
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every expired entry. Reads already evict lazily; this exists for
    /// callers that want to bound memory between reads.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1u64, "hello".to_string());

        assert_eq!(cache.get(&1), Some("hello".to_string()));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_expired_entry_is_gone() {
        let cache = TtlCache::new(Duration::from_millis(50));
        cache.insert(1u64, "hello".to_string());

        assert_eq!(cache.get(&1), Some("hello".to_string()));

        thread::sleep(Duration::from_millis(80));

        assert_eq!(cache.get(&1), None);
        // The expired read also evicted the entry.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = TtlCache::new(Duration::from_millis(60));
        cache.insert(1u64, "old".to_string());

        thread::sleep(Duration::from_millis(40));
        cache.insert(2u64, "new".to_string());

        thread::sleep(Duration::from_millis(30));
        cache.purge_expired();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some("new".to_string()));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();
        cache.insert("k".to_string(), 7u32);

        assert_eq!(other.get(&"k".to_string()), Some(7));
    }
}

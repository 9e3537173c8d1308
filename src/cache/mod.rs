//! Stale-while-revalidate cache for fetched content
//!
//! Entries stay usable after their window expires: a lookup reports them as
//! stale so the caller can serve the old value while it refreshes in the
//! background.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default upper bound on stored entries
pub const DEFAULT_MAX_ENTRIES: usize = 512;

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Inside its window, serve as-is
    Fresh(V),
    /// Window elapsed, serve and refresh
    Stale(V),
    /// Nothing cached
    Miss,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    window: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.window
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub stale: usize,
    pub max: usize,
}

/// Keyed store where each entry carries its own revalidation window
#[derive(Debug)]
pub struct RevalidateCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    max_entries: usize,
}

impl<V: Clone> RevalidateCache<V> {
    /// Create a cache holding at most `max_entries` values
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Look up `key` and classify the entry by its window
    pub fn lookup(&self, key: &str) -> Lookup<V> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(_) => return Lookup::Miss,
        };

        match entries.get(key) {
            Some(entry) if entry.is_fresh() => Lookup::Fresh(entry.value.clone()),
            Some(entry) => Lookup::Stale(entry.value.clone()),
            None => Lookup::Miss,
        }
    }

    /// Store `value` under `key`, fresh for `window`
    pub fn insert(&self, key: &str, value: V, window: Duration) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(_) => return,
        };

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            Self::evict_oldest(&mut entries);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                window,
            },
        );
    }

    /// Drop the entry for `key`
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (total, stale) = match self.entries.read() {
            Ok(entries) => (
                entries.len(),
                entries.values().filter(|e| !e.is_fresh()).count(),
            ),
            Err(_) => (0, 0),
        };
        CacheStats {
            total,
            stale,
            max: self.max_entries,
        }
    }

    fn evict_oldest(entries: &mut HashMap<String, CacheEntry<V>>) {
        if let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, e)| e.stored_at)
            .map(|(k, _)| k.clone())
        {
            tracing::debug!("Evicting cache entry {}", oldest);
            entries.remove(&oldest);
        }
    }
}

impl<V: Clone> Default for RevalidateCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_insert_and_lookup() {
        let cache = RevalidateCache::new(10);
        assert_eq!(cache.lookup("home"), Lookup::Miss);

        cache.insert("home", "v1".to_string(), Duration::from_secs(60));
        assert_eq!(cache.lookup("home"), Lookup::Fresh("v1".to_string()));
    }

    #[test]
    fn test_entry_goes_stale() {
        let cache = RevalidateCache::new(10);
        cache.insert("page", 1u32, Duration::from_millis(20));
        sleep(Duration::from_millis(40));

        assert_eq!(cache.lookup("page"), Lookup::Stale(1));
        assert_eq!(cache.stats().stale, 1);

        cache.insert("page", 2u32, Duration::from_secs(60));
        assert_eq!(cache.lookup("page"), Lookup::Fresh(2));
    }

    #[test]
    fn test_windows_are_per_entry() {
        let cache = RevalidateCache::new(10);
        cache.insert("short", 1u8, Duration::ZERO);
        cache.insert("long", 2u8, Duration::from_secs(3600));

        assert_eq!(cache.lookup("short"), Lookup::Stale(1));
        assert_eq!(cache.lookup("long"), Lookup::Fresh(2));
    }

    #[test]
    fn test_max_entries() {
        let cache = RevalidateCache::new(3);
        for i in 0..5 {
            cache.insert(&format!("k{}", i), i, Duration::from_secs(60));
            sleep(Duration::from_millis(2));
        }

        let stats = cache.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.max, 3);
        assert_eq!(cache.lookup("k0"), Lookup::Miss);
        assert_eq!(cache.lookup("k4"), Lookup::Fresh(4));
    }

    #[test]
    fn test_invalidate() {
        let cache = RevalidateCache::new(10);
        cache.insert("a", 1, Duration::from_secs(60));
        cache.insert("b", 2, Duration::from_secs(60));

        cache.invalidate("a");
        assert_eq!(cache.lookup("a"), Lookup::Miss);
        assert_eq!(cache.stats().total, 1);
        assert_eq!(cache.lookup("b"), Lookup::Fresh(2));
    }
}

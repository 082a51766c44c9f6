//! Bounded cache of synthesized images.
//!
//! Entries are keyed by their derived asset key. When the cache is full the
//! least recently used entry is evicted; callers can also drop single keys,
//! key families or everything.

use crate::{Image, Result};
use colonist_core::AssetKey;
use image::RgbaImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Hit and eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry {
    image: Image,
    last_used: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<AssetKey, Entry>,
    tick: u64,
    generation: u64,
    stats: CacheStats,
}

impl CacheInner {
    fn touch(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            trace!(key = %oldest, "evicting derived image");
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
        }
    }
}

/// Least-recently-used cache of derived images.
pub struct DerivedImageCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl DerivedImageCache {
    /// Create a cache holding at most `capacity` images (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a cached image.
    pub fn get(&self, key: &AssetKey) -> Option<Image> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let tick = inner.touch();
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = tick;
                let image = Arc::clone(&entry.image);
                inner.stats.hits += 1;
                Some(image)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Store `image` under `key`. If another caller stored the same key in the
    /// meantime, the earlier image wins and is returned.
    pub fn insert(&self, key: AssetKey, image: Image) -> Image {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let tick = inner.touch();
        if let Some(existing) = inner.entries.get_mut(&key) {
            existing.last_used = tick;
            return Arc::clone(&existing.image);
        }
        inner.entries.insert(
            key,
            Entry {
                image: Arc::clone(&image),
                last_used: tick,
            },
        );
        inner.evict_to(self.capacity);
        image
    }

    /// Return the cached image or synthesize, store and return a new one.
    ///
    /// The lock is not held while `synthesize` runs, so two threads may
    /// render the same key; only the first result is kept.
    pub fn get_or_try_insert_with<F>(&self, key: &AssetKey, synthesize: F) -> Result<Image>
    where
        F: FnOnce() -> Result<RgbaImage>,
    {
        if let Some(image) = self.get(key) {
            return Ok(image);
        }
        let image = Arc::new(synthesize()?);
        Ok(self.insert(key.clone(), image))
    }

    /// Drop one entry. Returns true if it was present.
    pub fn invalidate(&self, key: &AssetKey) -> bool {
        self.inner.lock().entries.remove(key).is_some()
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|k, _| !k.as_str().starts_with(prefix));
        before - inner.entries.len()
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.entries.len();
        inner.entries.clear();
        debug!(dropped, "derived image cache cleared");
    }

    /// Clear the cache if the resource store generation moved on since the
    /// last call. Returns true if entries were dropped.
    pub fn sync_generation(&self, generation: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation == generation {
            return false;
        }
        inner.generation = generation;
        let had_entries = !inner.entries.is_empty();
        inner.entries.clear();
        if had_entries {
            debug!(generation, "resource store reloaded, derived images dropped");
        }
        had_entries
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            ..inner.stats
        }
    }
}

impl std::fmt::Debug for DerivedImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedImageCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(shade: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, image::Rgba([shade, shade, shade, 255]))
    }

    fn key(name: &str) -> AssetKey {
        AssetKey::new(format!("dynamic.test.{name}"))
    }

    #[test]
    fn test_second_lookup_returns_same_instance() {
        let cache = DerivedImageCache::new(4);
        let first = cache.get_or_try_insert_with(&key("a"), || Ok(image(1))).unwrap();
        let second = cache
            .get_or_try_insert_with(&key("a"), || panic!("must not synthesize twice"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_lru_eviction() {
        let cache = DerivedImageCache::new(2);
        cache.insert(key("a"), Arc::new(image(1)));
        cache.insert(key("b"), Arc::new(image(2)));
        assert!(cache.get(&key("a")).is_some());
        cache.insert(key("c"), Arc::new(image(3)));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = DerivedImageCache::new(2);
        let first = cache.insert(key("a"), Arc::new(image(1)));
        let second = cache.insert(key("a"), Arc::new(image(2)));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidation() {
        let cache = DerivedImageCache::new(8);
        cache.insert(key("chip.a"), Arc::new(image(1)));
        cache.insert(key("chip.b"), Arc::new(image(2)));
        cache.insert(key("faded.a"), Arc::new(image(3)));

        assert!(cache.invalidate(&key("faded.a")));
        assert!(!cache.invalidate(&key("faded.a")));
        assert_eq!(cache.invalidate_prefix("dynamic.test.chip."), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_generation_change_clears() {
        let cache = DerivedImageCache::new(8);
        assert!(!cache.sync_generation(0));
        cache.insert(key("a"), Arc::new(image(1)));
        assert!(!cache.sync_generation(0));
        assert!(cache.sync_generation(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_synthesis_is_not_cached() {
        let cache = DerivedImageCache::new(2);
        let result = cache.get_or_try_insert_with(&key("bad"), || {
            Err(crate::MediaError::Synthesis("boom".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}

//! Memo of how many numbered variants each asset family has.

use crate::store::ResourceStore;
use colonist_core::keys;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
struct Counts {
    generation: u64,
    by_prefix: HashMap<String, usize>,
}

/// Counts store keys per family prefix once, and forgets them when the store
/// is reloaded or [`VariantCounter::clear`] is called.
#[derive(Default)]
pub struct VariantCounter {
    counts: RwLock<Counts>,
}

impl VariantCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store keys starting with `prefix`.
    pub fn count(&self, store: &dyn ResourceStore, prefix: &str) -> usize {
        let generation = store.generation();
        {
            let counts = self.counts.read();
            if counts.generation == generation {
                if let Some(count) = counts.by_prefix.get(prefix) {
                    return *count;
                }
            }
        }

        let count = store.keys_with_prefix(prefix).len();
        let mut counts = self.counts.write();
        if counts.generation != generation {
            counts.by_prefix.clear();
            counts.generation = generation;
        }
        counts.by_prefix.insert(prefix.to_string(), count);
        debug!(prefix, count, "counted asset variants");
        count
    }

    /// Index of the variant of `prefix` to show for `seed`, or `None` if the
    /// family is empty.
    pub fn pick(&self, store: &dyn ResourceStore, prefix: &str, seed: &str) -> Option<usize> {
        keys::variant_index(seed, self.count(store, prefix))
    }

    /// Forget all counts.
    pub fn clear(&self) {
        self.counts.write().by_prefix.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryResourceStore;
    use image::RgbaImage;

    fn store_with_overlays(n: usize) -> MemoryResourceStore {
        let store = MemoryResourceStore::new();
        for i in 0..n {
            store.insert_image(format!("model.tile.hills.overlay{i}.image"), RgbaImage::new(1, 1));
        }
        store
    }

    #[test]
    fn test_count_is_memoized_until_reload() {
        let store = store_with_overlays(3);
        let counter = VariantCounter::new();
        assert_eq!(counter.count(&store, "model.tile.hills.overlay"), 3);

        // New keys are not seen until the store generation changes.
        store.insert_image("model.tile.hills.overlay3.image", RgbaImage::new(1, 1));
        assert_eq!(counter.count(&store, "model.tile.hills.overlay"), 3);

        store.bump_generation();
        assert_eq!(counter.count(&store, "model.tile.hills.overlay"), 4);
    }

    #[test]
    fn test_pick_is_stable() {
        let store = store_with_overlays(3);
        let counter = VariantCounter::new();
        let first = counter.pick(&store, "model.tile.hills.overlay", "tile:42");
        assert!(first.is_some_and(|i| i < 3));
        assert_eq!(first, counter.pick(&store, "model.tile.hills.overlay", "tile:42"));
        assert_eq!(counter.pick(&store, "model.tile.desert.overlay", "tile:42"), None);
    }
}

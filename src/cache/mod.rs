//! Decoded image cache.
//!
//! The projection only ever asks "is this image ready?": `get` returns the
//! decoded image or a miss and never blocks on I/O. Filling the cache is the
//! preloader's job.

#[cfg(feature = "native")]
pub mod preload;

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::rendering::coord::{ImageSpace, Size};
use crate::rendering::types::{DecodedImage, ImageId};

/// Default number of decoded images kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Lookup of decoded images by id.
pub trait ImageCache: Send + Sync {
    /// Decoded image for `id`, or `None` on a miss.
    fn get(&self, id: &ImageId) -> Option<Arc<DecodedImage>>;

    fn contains(&self, id: &ImageId) -> bool {
        self.get(id).is_some()
    }

    /// Source size of `id` when cached.
    fn dimensions(&self, id: &ImageId) -> Option<Size<ImageSpace>> {
        self.get(id).map(|image| image.size())
    }
}

impl ImageCache for HashMap<ImageId, Arc<DecodedImage>> {
    fn get(&self, id: &ImageId) -> Option<Arc<DecodedImage>> {
        HashMap::get(self, id).cloned()
    }

    fn contains(&self, id: &ImageId) -> bool {
        self.contains_key(id)
    }
}

/// Thread-safe LRU cache of decoded images.
///
/// `get` refreshes recency, so images still on the trail stay resident while
/// the least recently drawn ones are evicted first.
pub struct LruImageCache {
    inner: Mutex<LruCache<ImageId, Arc<DecodedImage>>>,
}

impl LruImageCache {
    /// Create a cache holding at most `capacity` images (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Insert a decoded image, evicting the least recently used one if full.
    pub fn insert(&self, id: ImageId, image: Arc<DecodedImage>) {
        let mut cache = self.inner.lock();
        if let Some((evicted, _)) = cache.push(id.clone(), image) {
            if evicted != id {
                log::debug!("[CACHE] Evicted {}", evicted);
            }
        }
    }

    pub fn remove(&self, id: &ImageId) -> Option<Arc<DecodedImage>> {
        self.inner.lock().pop(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for LruImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ImageCache for LruImageCache {
    fn get(&self, id: &ImageId) -> Option<Arc<DecodedImage>> {
        self.inner.lock().get(id).cloned()
    }

    fn contains(&self, id: &ImageId) -> bool {
        self.inner.lock().contains(id)
    }
}

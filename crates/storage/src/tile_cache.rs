//! In-memory byte-bounded cache for rendered tiles.
//!
//! This provides sub-millisecond access to recently rendered tiles. The
//! cache is the only mutable shared state in the core: it is owned by the
//! server and passed by shared reference to every request handler.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

use trackmap_common::TileCoord;

/// Default cache capacity: 100 MiB of encoded PNG bytes.
pub const DEFAULT_CACHE_CAPACITY: u64 = 100 * 1024 * 1024;

/// Cache key for rendered tiles.
///
/// The palette and filter digests come from the canonical forms of the fully
/// normalized request options, so equivalent requests share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCacheKey {
    pub coord: TileCoord,
    pub palette_digest: u32,
    pub filter_digest: u32,
}

impl TileCacheKey {
    pub fn new(coord: TileCoord, palette_digest: u32, filter_digest: u32) -> Self {
        Self {
            coord,
            palette_digest,
            filter_digest,
        }
    }
}

impl std::fmt::Display for TileCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tile:{}:{:08x}:{:08x}",
            self.coord.cache_key(),
            self.palette_digest,
            self.filter_digest
        )
    }
}

#[derive(Default)]
pub struct TileCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub size_bytes: AtomicU64,
}

impl TileCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// In-memory tile cache bounded by total value bytes.
///
/// Design considerations:
/// - Short critical sections; `Bytes` values clone without copying, so the
///   lock is never held while a response is transmitted.
/// - Eviction in LRU order whenever total bytes exceed capacity. With no
///   intervening reads this equals insertion order.
/// - Atomic counters for hit/miss/eviction tracking.
pub struct TileCache {
    inner: RwLock<LruCache<TileCacheKey, Bytes>>,
    capacity_bytes: u64,
    stats: TileCacheStats,
}

impl TileCache {
    /// Create a cache holding at most `capacity_bytes` of encoded tiles.
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            inner: RwLock::new(LruCache::unbounded()),
            capacity_bytes,
            stats: TileCacheStats::default(),
        }
    }

    /// Get a cached tile.
    ///
    /// The returned `Bytes` is a shared handle; the lock is released before
    /// the caller touches the data.
    pub async fn get(&self, key: &TileCacheKey) -> Option<Bytes> {
        let mut cache = self.inner.write().await;
        match cache.get(key) {
            Some(data) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(data.clone())
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a rendered tile, evicting the oldest entries while the total
    /// exceeds capacity.
    ///
    /// A value larger than the entire capacity is refused: evicting the whole
    /// cache still could not make it fit.
    pub async fn put(&self, key: TileCacheKey, data: Bytes) {
        let len = data.len() as u64;
        if len > self.capacity_bytes {
            return;
        }

        let mut cache = self.inner.write().await;
        if let Some(old) = cache.put(key, data) {
            self.stats
                .size_bytes
                .fetch_sub(old.len() as u64, Ordering::Relaxed);
        }
        self.stats.size_bytes.fetch_add(len, Ordering::Relaxed);

        while self.stats.size_bytes.load(Ordering::Relaxed) > self.capacity_bytes {
            let Some((_, evicted)) = cache.pop_lru() else {
                break;
            };
            self.stats
                .size_bytes
                .fetch_sub(evicted.len() as u64, Ordering::Relaxed);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Empty the cache; returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        let mut cache = self.inner.write().await;
        let removed = cache.len();
        cache.clear();
        self.stats.size_bytes.store(0, Ordering::Relaxed);
        removed
    }

    /// Current number of entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Configured capacity in bytes.
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    /// Total bytes currently stored.
    pub fn size_bytes(&self) -> u64 {
        self.stats.size_bytes.load(Ordering::Relaxed)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> TileCacheStats {
        TileCacheStats {
            hits: AtomicU64::new(self.stats.hits.load(Ordering::Relaxed)),
            misses: AtomicU64::new(self.stats.misses.load(Ordering::Relaxed)),
            evictions: AtomicU64::new(self.stats.evictions.load(Ordering::Relaxed)),
            size_bytes: AtomicU64::new(self.stats.size_bytes.load(Ordering::Relaxed)),
        }
    }
}

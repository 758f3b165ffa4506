//! In-memory LRU translation cache with TTL.
//! Key: blake3 hash of (model | normalized input). Capacity 512, TTL 10 minutes.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::SplitReply;

struct CacheEntry {
    reply: SplitReply,
    inserted_at: Instant,
}

pub struct TranslationCache {
    inner: Mutex<LruCache<[u8; 32], CacheEntry>>,
    ttl: Duration,
}

impl TranslationCache {
    pub const DEFAULT_CAPACITY: usize = 512;
    pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Collapse whitespace so trivially different inputs share an entry.
    pub fn normalize(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn compute_key(model: &str, normalized_text: &str) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model.as_bytes());
        hasher.update(b"|");
        hasher.update(normalized_text.as_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Look up a cached translation. Returns None if absent or expired.
    pub fn get(&self, key: &[u8; 32]) -> Option<SplitReply> {
        let mut cache = self.inner.lock();
        if let Some(entry) = cache.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.reply.clone());
            }
            cache.pop(key);
        }
        None
    }

    pub fn insert(&self, key: [u8; 32], reply: SplitReply) {
        self.inner.lock().put(
            key,
            CacheEntry {
                reply,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_TTL)
    }
}

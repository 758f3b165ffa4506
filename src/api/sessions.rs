//! Bounded in-memory session stores keyed by UUID.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;

/// Per-client state of one feature. The least recently used session is
/// evicted once the store is full.
pub struct SessionStore<T> {
    inner: Mutex<LruCache<Uuid, T>>,
}

impl<T> SessionStore<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Store a new session and return its id.
    pub fn insert(&self, value: T) -> Uuid {
        let id = Uuid::new_v4();
        if let Some((evicted, _)) = self.inner.lock().push(id, value) {
            if evicted != id {
                tracing::debug!(session = %evicted, "session evicted");
            }
        }
        id
    }

    /// Run `f` against a session. The lock is released before returning,
    /// so `f` must not await.
    pub fn with_mut<R>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.lock().get_mut(id).map(f)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> SessionStore<T> {
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.inner.lock().get(id).cloned()
    }
}

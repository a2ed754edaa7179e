//! Concurrent translation cache.
//!
//! A bounded map keyed by (text, source, target) with FIFO eviction.
//! Purely a performance optimization: correctness never depends on a hit,
//! and concurrent runs may insert and look up freely.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    source: String,
    target: String,
}

/// Bounded, thread-safe cache of completed translations.
///
/// Only published (fully completed) results are inserted, so a lookup never
/// observes another run's in-flight work.
#[derive(Debug)]
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

impl TranslationCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Look up a completed translation.
    pub fn get(&self, text: &str, source: &str, target: &str) -> Option<String> {
        let key = CacheKey {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        };
        let inner = self.inner.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the lock leaves valid entries; keep serving them.
            poisoned.into_inner()
        });
        inner.entries.get(&key).cloned()
    }

    /// Publish a completed translation, evicting the oldest entry when full.
    pub fn insert(&self, text: &str, source: &str, target: &str, translated: &str) {
        let key = CacheKey {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        };
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, translated.to_string());
            return;
        }

        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.entries.insert(key.clone(), translated.to_string());
        inner.order.push_back(key);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

/// Key for one cached word translation. Structured rather than joined into a
/// single string so no delimiter can collide with word or language content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub word: String,
    pub source: String,
    pub target: String,
}

impl CacheKey {
    pub fn new(word: &str, source: &str, target: &str) -> Self {
        Self {
            word: word.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    written_at: Instant,
    seq: u64,
}

struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    // Write order, oldest first. Overwritten keys leave stale slots behind;
    // a slot is live only while its seq matches the map entry's seq.
    order: VecDeque<(u64, CacheKey)>,
    next_seq: u64,
}

/// Bounded, time-expiring store of word translations, shared by every
/// request in the process. Entries older than the TTL behave as absent and
/// are dropped on access; at capacity the oldest write is evicted first.
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    max_entries: usize,
}

impl TranslationCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                next_seq: 0,
            }),
            ttl,
            max_entries,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&self, key: CacheKey, value: String) {
        self.put_at(key, value, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<String> {
        let mut inner = self.lock();

        let expired = match inner.entries.get(key) {
            Some(entry) => now.duration_since(entry.written_at) > self.ttl,
            None => return None,
        };

        if expired {
            // The stale order slot is reconciled lazily during eviction.
            inner.entries.remove(key);
            return None;
        }

        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    fn put_at(&self, key: CacheKey, value: String, now: Instant) {
        let mut inner = self.lock();

        let seq = inner.next_seq;
        inner.next_seq += 1;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_entries {
            Self::evict_oldest(&mut inner);
        }

        // Last write wins; a rewrite refreshes the entry's age without
        // occupying a second capacity slot.
        inner.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                written_at: now,
                seq,
            },
        );
        inner.order.push_back((seq, key));

        // Rewrites and expiry leave stale slots behind; compact before the
        // queue can outgrow the map.
        if inner.order.len() > self.max_entries.saturating_mul(2) {
            Self::compact_order(&mut inner);
        }
    }

    fn evict_oldest(inner: &mut CacheInner) {
        while let Some((seq, key)) = inner.order.pop_front() {
            let live = inner.entries.get(&key).map(|entry| entry.seq) == Some(seq);
            if live {
                inner.entries.remove(&key);
                return;
            }
        }
    }

    fn compact_order(inner: &mut CacheInner) {
        let CacheInner { entries, order, .. } = inner;
        order.retain(|(seq, key)| entries.get(key).map(|entry| entry.seq) == Some(*seq));
    }
}

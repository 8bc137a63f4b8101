use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::types::{CacheEntry, CacheStats, ContentHash};
use crate::classifier::ComplexityVerdict;
use crate::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_MINUTES};

/// Process-wide store of classifier verdicts keyed by code content
///
/// Expiry is lazy: an expired entry reads as absent and is only dropped when
/// the bound forces a purge or the cache is cleared.
#[derive(Debug)]
pub struct AnnotationCache {
    ttl: Duration,
    max_entries: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<ContentHash, Slot>,
    tick: u64,
    hits: usize,
    misses: usize,
    evictions: usize,
}

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    last_used: u64,
}

impl Default for AnnotationCache {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_CACHE_TTL_MINUTES * 60),
            DEFAULT_CACHE_MAX_ENTRIES,
        )
    }
}

impl AnnotationCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// SHA-256 of the exact text; no whitespace normalization
    pub fn content_hash(code: &str) -> ContentHash {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        ContentHash(format!("{:x}", hasher.finalize()))
    }

    /// Cached verdict for `code`, if present and fresh
    pub fn get(&self, code: &str) -> Option<ComplexityVerdict> {
        self.get_by_hash(&Self::content_hash(code))
    }

    pub fn get_by_hash(&self, hash: &ContentHash) -> Option<ComplexityVerdict> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        let fresh = match inner.slots.get_mut(hash) {
            Some(slot) if !slot.entry.is_expired(now, self.ttl) => {
                slot.last_used = tick;
                Some(slot.entry.verdict.clone())
            }
            _ => None,
        };

        match fresh {
            Some(verdict) => {
                inner.hits += 1;
                Some(verdict)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a verdict, replacing any entry for the same content
    pub fn put(&self, code: &str, verdict: ComplexityVerdict) {
        let hash = Self::content_hash(code);
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.slots.contains_key(&hash) && inner.slots.len() >= self.max_entries {
            self.make_room(&mut inner, now);
        }

        let entry = CacheEntry {
            content_hash: hash.clone(),
            verdict,
            created_at: now,
        };
        inner.slots.insert(
            hash,
            Slot {
                entry,
                last_used: tick,
            },
        );
    }

    /// Purge expired entries, then the least recently used one if still full
    fn make_room(&self, inner: &mut Inner, now: Instant) {
        let before = inner.slots.len();
        let ttl = self.ttl;
        inner.slots.retain(|_, slot| !slot.entry.is_expired(now, ttl));
        let mut evicted = before - inner.slots.len();

        if inner.slots.len() >= self.max_entries {
            let oldest = inner
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(hash, _)| hash.clone());
            if let Some(hash) = oldest {
                inner.slots.remove(&hash);
                evicted += 1;
            }
        }

        inner.evictions += evicted;
        debug!("cache full, evicted {} entries", evicted);
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.hits = 0;
        inner.misses = 0;
        inner.evictions = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let total_requests = inner.hits + inner.misses;
        let hit_rate = if total_requests > 0 {
            (inner.hits as f32 / total_requests as f32) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: inner.slots.len(),
            max_entries: self.max_entries,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CodeMetrics, Complexity};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn verdict(complexity: Complexity) -> ComplexityVerdict {
        ComplexityVerdict::new(complexity, 0.8, CodeMetrics::default())
    }

    #[test]
    fn test_exact_content_hit() {
        let cache = AnnotationCache::default();
        let code = "function f() {\n  return 1;\n}";
        cache.put(code, verdict(Complexity::Simple));

        let same = String::from("function f() {\n  return 1;\n}");
        assert_eq!(cache.get(&same), Some(verdict(Complexity::Simple)));
    }

    #[test]
    fn test_whitespace_difference_misses() {
        let cache = AnnotationCache::default();
        cache.put("function f() { return 1; }", verdict(Complexity::Simple));

        assert_eq!(cache.get("function f() {  return 1; }"), None);
        assert_eq!(cache.get("function f() { return 1; }\n"), None);
        assert_eq!(cache.get(" function f() { return 1; }"), None);
    }

    #[test]
    fn test_put_overwrites_same_content() {
        let cache = AnnotationCache::default();
        cache.put("a", verdict(Complexity::Simple));
        cache.put("a", verdict(Complexity::Complex));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(verdict(Complexity::Complex)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_boundary() {
        let ttl = Duration::from_secs(300);
        let cache = AnnotationCache::new(ttl, 10);
        cache.put("code", verdict(Complexity::Moderate));

        tokio::time::advance(ttl - Duration::from_millis(1)).await;
        assert_eq!(cache.get("code"), Some(verdict(Complexity::Moderate)));

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(cache.get("code"), None);
        // Lazy expiry keeps the stale entry in storage
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_purged_before_lru() {
        let cache = AnnotationCache::new(Duration::from_secs(60), 2);
        cache.put("old", verdict(Complexity::Simple));
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.put("fresh", verdict(Complexity::Simple));
        cache.put("newest", verdict(Complexity::Complex));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("fresh").is_some());
        assert!(cache.get("newest").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_least_recently_used_evicted() {
        let cache = AnnotationCache::new(Duration::from_secs(300), 2);
        cache.put("a", verdict(Complexity::Simple));
        cache.put("b", verdict(Complexity::Moderate));
        assert!(cache.get("a").is_some());

        cache.put("c", verdict(Complexity::Complex));
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_stats_and_clear() {
        let cache = AnnotationCache::default();
        cache.put("x", verdict(Complexity::Simple));
        let _ = cache.get("x");
        let _ = cache.get("y");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 50.0);
        assert!(stats.format().contains("50.0%"));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_concurrent_writers_do_not_corrupt() {
        let cache = Arc::new(AnnotationCache::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cache.put("shared", verdict(Complexity::Simple));
                        cache.put(&format!("own-{}", i), verdict(Complexity::Moderate));
                        assert!(cache.get("shared").is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 9);
    }
}

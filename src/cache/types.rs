use std::fmt;
use tokio::time::Instant;

use crate::classifier::ComplexityVerdict;

/// Content-addressed key: hex SHA-256 of the exact code text
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContentHash(pub String);

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored verdict; never mutated after insertion
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub content_hash: ContentHash,
    pub verdict: ComplexityVerdict,
    pub created_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant, ttl: std::time::Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub hit_rate: f32,
}

impl CacheStats {
    /// Format cache stats for display
    pub fn format(&self) -> String {
        format!(
            "Cache Statistics:\n\
            Entries: {} / {}\n\
            Hit Rate: {:.1}% ({} hits, {} misses)\n\
            Evictions: {}",
            self.entries,
            self.max_entries,
            self.hit_rate,
            self.hits,
            self.misses,
            self.evictions
        )
    }
}

use std::collections::HashMap;
use std::time::{Duration, Instant};

use verdict_core::ScoreResult;

/// A cached verdict for one product URL.
#[derive(Debug, Clone)]
struct CacheEntry {
    result: ScoreResult,
    created_at: Instant,
}

/// Time-bounded verdict cache keyed by product URL.
///
/// Entries expire after the TTL regardless of access pattern, and any newer
/// analysis for the same key overwrites the old entry. The cache has a
/// single logical writer (the orchestrator), so it needs no interior
/// locking.
#[derive(Debug)]
pub struct VerdictCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl VerdictCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached verdict for `key`, or `None` when absent or stale.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ScoreResult> {
        self.get_at(key, Instant::now())
    }

    /// Stores `result` under `key`, replacing any prior entry.
    pub fn insert(&mut self, key: String, result: ScoreResult) {
        self.insert_at(key, result, Instant::now());
    }

    /// Drops every entry. Used when navigation leaves the product context
    /// entirely.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // The `_at` variants take an explicit clock reading so TTL behavior is
    // testable without sleeping.

    fn get_at(&self, key: &str, now: Instant) -> Option<&ScoreResult> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.created_at) < self.ttl {
            Some(&entry.result)
        } else {
            None
        }
    }

    fn insert_at(&mut self, key: String, result: ScoreResult, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                created_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::{ProductRecord, Recommendation};

    fn verdict(score: u8) -> ScoreResult {
        let mut record = ProductRecord::new("https://example.com/dp/B000000000", "amazon");
        record.title = Some(format!("fixture {score}"));
        let mut result = verdict_scorer::score_product(&record);
        result.score = score;
        result.recommendation = Recommendation::from_score(score);
        result
    }

    const KEY: &str = "https://example.com/dp/B000000000";

    #[test]
    fn read_within_ttl_returns_written_value_unchanged() {
        let mut cache = VerdictCache::new(Duration::from_secs(300));
        let now = Instant::now();
        let written = verdict(77);

        cache.insert_at(KEY.to_owned(), written.clone(), now);
        let read = cache
            .get_at(KEY, now + Duration::from_secs(299))
            .expect("entry should still be fresh");
        assert_eq!(read, &written);
    }

    #[test]
    fn read_after_ttl_is_a_miss() {
        let mut cache = VerdictCache::new(Duration::from_secs(300));
        let now = Instant::now();

        cache.insert_at(KEY.to_owned(), verdict(77), now);
        assert!(cache.get_at(KEY, now + Duration::from_secs(300)).is_none());
    }

    #[test]
    fn newer_write_overwrites_for_same_key() {
        let mut cache = VerdictCache::new(Duration::from_secs(300));
        let now = Instant::now();

        cache.insert_at(KEY.to_owned(), verdict(40), now);
        cache.insert_at(KEY.to_owned(), verdict(80), now + Duration::from_secs(10));

        let read = cache.get_at(KEY, now + Duration::from_secs(20)).unwrap();
        assert_eq!(read.score, 80);
    }

    #[test]
    fn unknown_key_is_a_miss() {
        let cache = VerdictCache::new(Duration::from_secs(300));
        assert!(cache.get("https://example.com/other").is_none());
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = VerdictCache::new(Duration::from_secs(300));
        cache.insert(KEY.to_owned(), verdict(77));
        cache.clear();
        assert!(cache.get(KEY).is_none());
    }
}

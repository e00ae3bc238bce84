//! Latest scrape result per competitor.

use std::collections::BTreeMap;

use pricewatch_core::ScrapeResult;

/// Keyed store of the most recent [`ScrapeResult`] per competitor.
///
/// Entries are keyed by [`ScrapeResult::key`]; a `put` overwrites whatever
/// was stored for that key before. Nothing expires.
pub trait ResultRepository {
    fn put(&mut self, result: ScrapeResult);

    fn get(&self, key: &str) -> Option<&ScrapeResult>;

    /// Owned copy of every stored result, ordered by key.
    fn snapshot(&self) -> BTreeMap<String, ScrapeResult>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// In-process [`ResultRepository`]. Lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    results: BTreeMap<String, ScrapeResult>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultRepository for MemoryRepository {
    fn put(&mut self, result: ScrapeResult) {
        self.results.insert(result.key.clone(), result);
    }

    fn get(&self, key: &str) -> Option<&ScrapeResult> {
        self.results.get(key)
    }

    fn snapshot(&self) -> BTreeMap<String, ScrapeResult> {
        self.results.clone()
    }

    fn len(&self) -> usize {
        self.results.len()
    }

    fn clear(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pricewatch_core::Competitor;

    use super::*;

    fn failed(key: &str, error: &str) -> ScrapeResult {
        let competitor = Competitor::new(key, &key.to_uppercase(), "https://example.com/pricing");
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        ScrapeResult::failed(&competitor, error.to_string(), at)
    }

    #[test]
    fn starts_empty() {
        let repo = MemoryRepository::new();
        assert!(repo.is_empty());
        assert!(repo.get("carta").is_none());
        assert!(repo.snapshot().is_empty());
    }

    #[test]
    fn put_overwrites_previous_entry() {
        let mut repo = MemoryRepository::new();
        repo.put(failed("nvr", "first"));
        repo.put(failed("nvr", "second"));
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get("nvr").unwrap().error.as_deref(), Some("second"));
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut repo = MemoryRepository::new();
        repo.put(failed("ledgy", "boom"));
        let snapshot = repo.snapshot();
        repo.clear();
        assert!(repo.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("ledgy"));
    }

    #[test]
    fn snapshot_is_ordered_by_key() {
        let mut repo = MemoryRepository::new();
        for key in ["mantle", "bolago", "carta"] {
            repo.put(failed(key, "x"));
        }
        let keys: Vec<String> = repo.snapshot().into_keys().collect();
        assert_eq!(keys, vec!["bolago", "carta", "mantle"]);
    }
}

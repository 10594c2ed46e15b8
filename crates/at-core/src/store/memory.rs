//! In-memory store implementations.
//!
//! Interior mutability behind a mutex gives the same isolation the
//! persistence layer provides: a compare-and-set on one source holds
//! the map lock for the duration of the check-and-write, so concurrent
//! classification events cannot lose an increment.

use super::{FrequencyStore, SourceStore};
use at_common::{Error, FrequencyBucket, KeywordId, Result, Source, SourceId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory source repository.
#[derive(Debug, Default)]
pub struct MemorySourceStore {
    sources: Mutex<HashMap<SourceId, Source>>,
}

impl MemorySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: impl IntoIterator<Item = Source>) -> Self {
        let map = sources.into_iter().map(|s| (s.id, s)).collect();
        MemorySourceStore {
            sources: Mutex::new(map),
        }
    }
}

impl SourceStore for MemorySourceStore {
    fn get(&self, id: SourceId) -> Result<Option<Source>> {
        let sources = self
            .sources
            .lock()
            .map_err(|_| Error::Store("source store mutex poisoned".to_string()))?;
        Ok(sources.get(&id).cloned())
    }

    fn compare_and_set(&self, expected: &Source, updated: &Source) -> Result<bool> {
        let mut sources = self
            .sources
            .lock()
            .map_err(|_| Error::Store("source store mutex poisoned".to_string()))?;
        match sources.get(&expected.id) {
            Some(current)
                if current.credibility_alpha == expected.credibility_alpha
                    && current.credibility_beta == expected.credibility_beta =>
            {
                sources.insert(updated.id, updated.clone());
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(Error::SourceNotFound {
                source_id: expected.id,
            }),
        }
    }

    fn insert_if_absent(&self, source: &Source) -> Result<()> {
        let mut sources = self
            .sources
            .lock()
            .map_err(|_| Error::Store("source store mutex poisoned".to_string()))?;
        sources.entry(source.id).or_insert_with(|| source.clone());
        Ok(())
    }
}

/// In-memory frequency bucket store.
#[derive(Debug, Default)]
pub struct MemoryFrequencyStore {
    buckets: Mutex<HashMap<KeywordId, BTreeMap<NaiveDate, u32>>>,
}

impl MemoryFrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a keyword's history, for tests.
    pub fn seed(&self, keyword: KeywordId, days: impl IntoIterator<Item = (NaiveDate, u32)>) {
        let mut buckets = self.buckets.lock().expect("frequency store mutex");
        let entry = buckets.entry(keyword).or_default();
        for (date, count) in days {
            entry.insert(date, count);
        }
    }
}

impl FrequencyStore for MemoryFrequencyStore {
    fn daily_counts(
        &self,
        keyword: KeywordId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FrequencyBucket>> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|_| Error::Store("frequency store mutex poisoned".to_string()))?;
        let Some(days) = buckets.get(&keyword) else {
            return Ok(Vec::new());
        };
        Ok(days
            .range(from..to)
            .map(|(date, count)| FrequencyBucket {
                keyword_id: keyword,
                date: *date,
                count: *count,
            })
            .collect())
    }

    fn count_on(&self, keyword: KeywordId, date: NaiveDate) -> Result<u32> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|_| Error::Store("frequency store mutex poisoned".to_string()))?;
        Ok(buckets
            .get(&keyword)
            .and_then(|days| days.get(&date))
            .copied()
            .unwrap_or(0))
    }

    fn increment(&self, keyword: KeywordId, date: NaiveDate) -> Result<()> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| Error::Store("frequency store mutex poisoned".to_string()))?;
        *buckets.entry(keyword).or_default().entry(date).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(alpha: f64, beta: f64) -> Source {
        Source {
            id: SourceId::new(),
            name: "feed".into(),
            source_type: "rss".into(),
            credibility_alpha: alpha,
            credibility_beta: beta,
        }
    }

    #[test]
    fn cas_succeeds_on_matching_snapshot() {
        let s = source(2.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);
        let mut updated = s.clone();
        updated.credibility_alpha = 3.0;
        assert!(store.compare_and_set(&s, &updated).unwrap());
        assert_eq!(store.get(s.id).unwrap().unwrap().credibility_alpha, 3.0);
    }

    #[test]
    fn cas_fails_on_stale_snapshot() {
        let s = source(2.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);

        // Another writer advances the posterior first.
        let mut other = s.clone();
        other.credibility_beta = 3.0;
        assert!(store.compare_and_set(&s, &other).unwrap());

        // The stale snapshot must now be rejected.
        let mut mine = s.clone();
        mine.credibility_alpha = 3.0;
        assert!(!store.compare_and_set(&s, &mine).unwrap());
    }

    #[test]
    fn cas_on_missing_source_errors() {
        let store = MemorySourceStore::new();
        let s = source(2.0, 2.0);
        let err = store.compare_and_set(&s, &s).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[test]
    fn increments_accumulate_per_day() {
        let store = MemoryFrequencyStore::new();
        let kw = KeywordId::new();
        let day = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        for _ in 0..3 {
            store.increment(kw, day).unwrap();
        }
        assert_eq!(store.count_on(kw, day).unwrap(), 3);

        let counts = store
            .daily_counts(kw, day, day.succ_opt().unwrap())
            .unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 3);
    }

    #[test]
    fn range_query_excludes_upper_bound() {
        let store = MemoryFrequencyStore::new();
        let kw = KeywordId::new();
        let d1 = NaiveDate::from_ymd_opt(2026, 8, 18).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();
        store.seed(kw, [(d1, 2), (d2, 5)]);

        let counts = store.daily_counts(kw, d1, d2).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].date, d1);
    }
}

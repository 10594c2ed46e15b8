//! Store abstraction for the only mutable shared state the core
//! depends on: source credibility posteriors and keyword frequency
//! buckets.
//!
//! Both are owned by the persistence collaborator and accessed through
//! an explicit read/update contract: compare-and-set for sources,
//! transactional increment for buckets. Never through ambient global
//! state. In-memory implementations are provided for tests and
//! embedding.

pub mod memory;

pub use memory::{MemoryFrequencyStore, MemorySourceStore};

use at_common::{FrequencyBucket, KeywordId, Result, Source, SourceId};
use chrono::NaiveDate;

/// Read/update contract for source credibility state.
pub trait SourceStore {
    /// Fetch the current snapshot of a source.
    fn get(&self, id: SourceId) -> Result<Option<Source>>;

    /// Atomically replace `expected` with `updated`.
    ///
    /// Returns `false` without writing if the stored posterior no
    /// longer matches `expected` (a concurrent update won); the caller
    /// re-reads and retries.
    fn compare_and_set(&self, expected: &Source, updated: &Source) -> Result<bool>;

    /// Insert a source if absent (used to seed priors).
    fn insert_if_absent(&self, source: &Source) -> Result<()>;
}

/// Read/increment contract for keyword frequency buckets.
pub trait FrequencyStore {
    /// Daily counts for `keyword` with `from <= date < to`, ascending
    /// by date. Days with no bucket are absent, not zero-filled.
    fn daily_counts(
        &self,
        keyword: KeywordId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FrequencyBucket>>;

    /// Count for a single day, zero if absent.
    fn count_on(&self, keyword: KeywordId, date: NaiveDate) -> Result<u32>;

    /// Transactionally increment a (keyword, day) bucket by one.
    fn increment(&self, keyword: KeywordId, date: NaiveDate) -> Result<()>;
}

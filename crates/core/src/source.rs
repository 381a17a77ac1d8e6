//! PaperSource trait — the abstraction over the daily paper feed.
//!
//! A source produces one read-only `Dataset` per calendar date. The real
//! implementation fetches arXiv RSS; tests use in-memory sources.

use crate::error::SourceError;
use crate::paper::Dataset;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Supplies the dated collection of paper records for one day.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// A human-readable name for this source (e.g., "arxiv-rss").
    fn name(&self) -> &str;

    /// Fetch the dataset for the given date.
    ///
    /// An empty dataset is a valid result (no new submissions); only a
    /// source that cannot be reached at all should error.
    async fn fetch(&self, date: NaiveDate) -> Result<Dataset, SourceError>;
}

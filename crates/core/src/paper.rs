//! Paper and Dataset domain types.
//!
//! These are the value objects that flow through the pipeline:
//! the feed produces a `Dataset` for one calendar day, the title filter
//! classifies its paper ids, and the abstract review consumes the promoted
//! subset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single arXiv paper as fetched from the daily feed.
///
/// Immutable once fetched; identified by its arXiv id (e.g. "2501.04567"),
/// which is stable and unique within a day's dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// The arXiv identifier, e.g. "2501.04567"
    pub id: String,

    /// Paper title, cleaned of markup and the trailing "(arXiv:...)" suffix
    pub title: String,

    /// The abstract. May be empty or truncated for some feed entries.
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,

    /// Comma-separated author list as provided by the feed
    #[serde(default)]
    pub authors: String,

    /// The arXiv category this record was fetched under (e.g. "quant-ph")
    pub category: String,

    /// Canonical abstract page URL
    pub url: String,

    /// Direct PDF URL
    #[serde(default)]
    pub pdf: String,
}

/// The full set of papers fetched for one calendar date.
///
/// Created once per date by the paper source and read-only thereafter.
/// The date is the natural cache key: one dataset per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// The processing date, `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Categories that were fetched to build this dataset
    #[serde(default)]
    pub categories: Vec<String>,

    /// Number of papers (always equals `papers.len()`)
    pub count: usize,

    /// Papers in feed order: deduplicated by id, sorted by descending id
    pub papers: Vec<PaperRecord>,
}

impl Dataset {
    /// Create a dataset, setting `count` from the paper list.
    pub fn new(date: NaiveDate, categories: Vec<String>, papers: Vec<PaperRecord>) -> Self {
        Self {
            date,
            categories,
            count: papers.len(),
            papers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// All paper ids in this dataset.
    pub fn ids(&self) -> HashSet<&str> {
        self.papers.iter().map(|p| p.id.as_str()).collect()
    }

    /// The papers whose ids are in `keep`, preserving dataset order.
    pub fn select<'a>(&'a self, keep: &HashSet<String>) -> Vec<&'a PaperRecord> {
        self.papers.iter().filter(|p| keep.contains(&p.id)).collect()
    }
}

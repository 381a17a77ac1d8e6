//! arXiv paper source — RSS fetch and parse.
//!
//! arXiv publishes one RSS feed per category containing the previous day's
//! new submissions. This crate fetches the configured categories, merges
//! them into a single deduplicated dataset, and hands it to the pipeline.
//!
//! A category that fails to fetch is logged and skipped; the run only fails
//! when every category errored and nothing at all was fetched.

mod rss;

use async_trait::async_trait;
use chrono::NaiveDate;
use paperscope_core::error::SourceError;
use paperscope_core::paper::{Dataset, PaperRecord};
use paperscope_core::source::PaperSource;
use std::collections::HashSet;
use tracing::{debug, warn};

const DEFAULT_FEED_BASE: &str = "https://rss.arxiv.org/rss";

/// Fetches daily new submissions from arXiv RSS feeds.
pub struct ArxivSource {
    categories: Vec<String>,
    feed_base: String,
    client: reqwest::Client,
}

impl ArxivSource {
    pub fn new(categories: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            categories,
            feed_base: DEFAULT_FEED_BASE.into(),
            client,
        }
    }

    async fn fetch_category(&self, category: &str) -> Result<Vec<PaperRecord>, SourceError> {
        let url = format!("{}/{}", self.feed_base, category);
        debug!(%category, %url, "Fetching arXiv feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Feed {
                category: category.into(),
                reason: format!("HTTP {}", response.status().as_u16()),
            });
        }

        let xml = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(rss::parse_feed(&xml, category))
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    fn name(&self) -> &str {
        "arxiv-rss"
    }

    async fn fetch(&self, date: NaiveDate) -> Result<Dataset, SourceError> {
        let mut all_papers = Vec::new();
        let mut failures = Vec::new();

        for category in &self.categories {
            match self.fetch_category(category).await {
                Ok(papers) => {
                    debug!(%category, count = papers.len(), "Fetched category");
                    all_papers.extend(papers);
                }
                Err(e) => {
                    warn!(%category, error = %e, "Failed to fetch category, skipping");
                    failures.push(format!("{category}: {e}"));
                }
            }
        }

        // Every category errored: surface the failure instead of caching a
        // misleading empty dataset. A successfully fetched empty feed (a
        // weekend) still produces an empty dataset.
        if all_papers.is_empty() && !failures.is_empty() && failures.len() == self.categories.len()
        {
            return Err(SourceError::Unavailable(failures.join("; ")));
        }

        let papers = dedup_and_sort(all_papers);
        Ok(Dataset::new(date, self.categories.clone(), papers))
    }
}

/// Deduplicate by id across categories (first occurrence wins) and sort by
/// descending id — newer papers have higher ids.
fn dedup_and_sort(papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<PaperRecord> = papers
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    unique.sort_by(|a, b| b.id.cmp(&a.id));
    unique
}

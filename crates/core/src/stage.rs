//! Pipeline stages and run outcomes.
//!
//! Stage completion is decided by the cache (entry exists and validates),
//! never by in-process state, so a rerun for the same date resumes exactly
//! where the previous run stopped.

use serde::{Deserialize, Serialize};

/// One durable, idempotent unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Fetch the day's dataset from the paper feed
    Fetch,
    /// Title-only classification into tiers
    Filter,
    /// Abstract review of the promoted subset
    Review,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Filter => "filter",
            Stage::Review => "review",
        }
    }

    /// All stages in execution order.
    pub fn all() -> [Stage; 3] {
        [Stage::Fetch, Stage::Filter, Stage::Review]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a date's pipeline currently stands, derived from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing cached for this date yet
    NoData,
    /// Dataset cached, no valid tier assignment
    Fetched,
    /// Dataset and tier assignment cached, no report
    Filtered,
    /// Report exists — the pipeline is complete for this date
    Done,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::NoData => "no data",
            PipelineState::Fetched => "fetched",
            PipelineState::Filtered => "filtered",
            PipelineState::Done => "done",
        };
        f.write_str(s)
    }
}

/// How a pipeline run ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Full pipeline success with per-tier counts
    Done {
        tier1: usize,
        tier2: usize,
        skipped: usize,
    },
    /// Zero papers fetched — a success terminal, e.g. a weekend
    Empty,
    /// Fetch-only run, halted before any gateway call
    DryRun { count: usize },
}

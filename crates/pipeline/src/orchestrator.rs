//! The pipeline orchestrator — one state machine per date.
//!
//! Stages run strictly in order, each gated on the durable completion of
//! the previous one: `NoData → Fetched → Filtered → Reviewed → Done`.
//! Completion is judged by the stage cache, so a rerun for the same date
//! skips every finished stage and makes zero duplicate gateway calls.
//!
//! Failure leaves the pipeline at its last completed stage. Nothing is
//! retried automatically; every error carries enough context to diagnose
//! and re-run by hand.

use crate::{extract, prompt, report};
use chrono::NaiveDate;
use paperscope_cache::StageCache;
use paperscope_core::error::{Error, Result};
use paperscope_core::gateway::{CompletionRequest, Gateway};
use paperscope_core::paper::Dataset;
use paperscope_core::source::PaperSource;
use paperscope_core::stage::{RunOutcome, Stage};
use paperscope_core::tiers::TierAssignment;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates the fetch → filter → review pipeline for one date at a time.
pub struct Pipeline {
    source: Arc<dyn PaperSource>,
    gateway: Arc<dyn Gateway>,
    cache: StageCache,

    /// Model used for both passes
    model: String,

    /// Sampling temperature for both passes
    temperature: f32,

    /// Reply budget for the title filter (a small JSON object)
    filter_max_tokens: u32,

    /// Reply budget for the abstract-review report
    review_max_tokens: u32,

    /// Research-interest text, passed through to both prompts verbatim
    interests: String,

    /// Prompt templates, embedded defaults unless overridden
    title_template: String,
    review_template: String,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn PaperSource>,
        gateway: Arc<dyn Gateway>,
        cache: StageCache,
        model: impl Into<String>,
        interests: impl Into<String>,
    ) -> Self {
        Self {
            source,
            gateway,
            cache,
            model: model.into(),
            temperature: 0.3,
            filter_max_tokens: 2048,
            review_max_tokens: 4096,
            interests: interests.into(),
            title_template: prompt::TITLE_FILTER_TEMPLATE.into(),
            review_template: prompt::ABSTRACT_REVIEW_TEMPLATE.into(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_filter_max_tokens(mut self, max: u32) -> Self {
        self.filter_max_tokens = max;
        self
    }

    pub fn with_review_max_tokens(mut self, max: u32) -> Self {
        self.review_max_tokens = max;
        self
    }

    pub fn with_title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = template.into();
        self
    }

    pub fn with_review_template(mut self, template: impl Into<String>) -> Self {
        self.review_template = template.into();
        self
    }

    /// Run the pipeline for a date. Safe to re-invoke: completed stages are
    /// served from the cache and never re-executed.
    ///
    /// With `dry_run`, halts after the fetch stage — before any gateway
    /// call — leaving the cached dataset behind for a later full run.
    pub async fn run(&self, date: NaiveDate, dry_run: bool) -> Result<RunOutcome> {
        let dataset = self.fetch_stage(date).await?;

        if dry_run {
            info!(%date, count = dataset.count, "Dry run, stopping after fetch");
            return Ok(RunOutcome::DryRun {
                count: dataset.count,
            });
        }

        if dataset.is_empty() {
            // Not an error — a weekend, say. Terminal success with a
            // report and zero gateway calls.
            if self.cache.load_report(date).is_none() {
                let _lock = self.cache.begin(date, Stage::Review)?;
                self.cache
                    .store_report(date, &report::empty_dataset_report(date))?;
            }
            info!(%date, "Empty dataset, nothing to triage");
            return Ok(RunOutcome::Empty);
        }

        let tiers = self.filter_stage(&dataset).await?;
        self.review_stage(&dataset, &tiers).await?;

        let (tier1, tier2, skipped) = tiers.counts();
        // `latest` names the newest report; re-running an older date must
        // not repoint it backwards.
        if self.cache.latest().is_none_or(|latest| date >= latest) {
            self.cache.set_latest(date)?;
        }
        info!(%date, tier1, tier2, skipped, "Pipeline complete");

        Ok(RunOutcome::Done {
            tier1,
            tier2,
            skipped,
        })
    }

    /// `NoData → Fetched`: use the cached dataset or fetch and store one.
    async fn fetch_stage(&self, date: NaiveDate) -> Result<Dataset> {
        if let Some(dataset) = self.cache.load_dataset(date) {
            debug!(%date, count = dataset.count, "Dataset already cached");
            return Ok(dataset);
        }

        let _lock = self.cache.begin(date, Stage::Fetch)?;
        let dataset = self.source.fetch(date).await?;
        self.cache.store_dataset(&dataset)?;
        info!(%date, count = dataset.count, source = self.source.name(), "Fetched dataset");
        Ok(dataset)
    }

    /// `Fetched → Filtered`: title-only classification, cached on success.
    ///
    /// On extraction failure the raw reply is preserved next to the cache
    /// entry it failed to become, and nothing is written to the cache.
    async fn filter_stage(&self, dataset: &Dataset) -> Result<TierAssignment> {
        let date = dataset.date;

        if let Some(tiers) = self.cache.load_valid_tiers(date, dataset) {
            debug!(%date, "Tier assignment already cached");
            return Ok(tiers);
        }

        let _lock = self.cache.begin(date, Stage::Filter)?;

        let rendered = prompt::render_title_filter(&self.title_template, dataset, &self.interests)?;
        let request = CompletionRequest::new(&self.model, rendered)
            .with_temperature(self.temperature)
            .with_max_tokens(self.filter_max_tokens);

        let raw = self.gateway.complete(request).await?;

        match extract::extract_tier_assignment(&raw, dataset) {
            Ok(tiers) => {
                self.cache.store_tiers(date, &tiers)?;
                let (tier1, tier2, skipped) = tiers.counts();
                info!(%date, tier1, tier2, skipped, "Title filter complete");
                Ok(tiers)
            }
            Err(e) => {
                let path = self.cache.store_rejected(date, &raw)?;
                warn!(%date, error = %e, preserved = %path.display(),
                      "Title filter reply failed extraction, raw text preserved");
                Err(Error::Extraction(e))
            }
        }
    }

    /// `Filtered → Reviewed`: abstract review over the promoted subset.
    ///
    /// An empty subset still produces a report — stating zero candidates —
    /// without a gateway call.
    async fn review_stage(&self, dataset: &Dataset, tiers: &TierAssignment) -> Result<()> {
        let date = dataset.date;

        if self.cache.load_report(date).is_some() {
            debug!(%date, "Report already cached");
            return Ok(());
        }

        let _lock = self.cache.begin(date, Stage::Review)?;

        let selected = tiers.selected_ids();
        let body = if selected.is_empty() {
            info!(%date, "Nothing promoted, synthesizing zero-candidate report");
            report::zero_candidates_report(date, tiers.skip.len())
        } else {
            let promoted = dataset.select(&selected);
            let rendered = prompt::render_abstract_review(
                &self.review_template,
                &promoted,
                date,
                &self.interests,
            )?;
            let request = CompletionRequest::new(&self.model, rendered)
                .with_temperature(self.temperature)
                .with_max_tokens(self.review_max_tokens);

            // Persisted verbatim: stage 2's output is human-consumed
            // markdown, no structural validation.
            self.gateway.complete(request).await?
        };

        self.cache.store_report(date, &body)?;
        info!(%date, "Report written");
        Ok(())
    }
}

//! `paperscope run` — Execute the triage pipeline for a date.

use chrono::NaiveDate;
use paperscope_cache::StageCache;
use paperscope_config::AppConfig;
use paperscope_core::Stage;
use paperscope_gateway::OpenAiCompatGateway;
use paperscope_pipeline::{Pipeline, report};
use paperscope_source::ArxivSource;
use std::sync::Arc;

pub async fn run(date: Option<NaiveDate>, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let interests = config.load_interests().map_err(|e| {
        format!("{e}\nNo research interests found. Run `paperscope init` and edit the file first.")
    })?;

    let gateway: Arc<OpenAiCompatGateway> = if dry_run {
        // No gateway call happens on a dry run; a placeholder key is fine.
        Arc::new(OpenAiCompatGateway::new(
            "openai-compat",
            &config.base_url,
            config.api_key.as_deref().unwrap_or("unused"),
        ))
    } else {
        let api_key = config.api_key.as_deref().ok_or(
            "No API key configured. Set PAPERSCOPE_API_KEY (or OPENROUTER_API_KEY) \
             or add api_key to ~/.paperscope/config.toml.",
        )?;
        Arc::new(OpenAiCompatGateway::new(
            "openai-compat",
            &config.base_url,
            api_key,
        ))
    };

    let source = Arc::new(ArxivSource::new(config.categories.clone()));
    let cache = StageCache::new(config.data_dir());
    let report_path = cache.artifact_path(date, Stage::Review);

    let mut pipeline = Pipeline::new(source, gateway, cache, &config.model, interests)
        .with_temperature(config.temperature)
        .with_filter_max_tokens(config.filter_max_tokens)
        .with_review_max_tokens(config.review_max_tokens);

    // Templates edited under <config>/prompts/ take precedence over the
    // embedded defaults.
    let prompts_dir = AppConfig::config_dir().join("prompts");
    if let Ok(template) = std::fs::read_to_string(prompts_dir.join("title_filter.md")) {
        pipeline = pipeline.with_title_template(template);
    }
    if let Ok(template) = std::fs::read_to_string(prompts_dir.join("abstract_review.md")) {
        pipeline = pipeline.with_review_template(template);
    }

    let outcome = pipeline.run(date, dry_run).await?;

    println!("{}", report::status_line(date, &outcome));
    if report_path.exists() {
        println!("Report: {}", report_path.display());
    }

    Ok(())
}

//! End-to-end orchestrator behavior: idempotence, resumability, terminal
//! states, and failure handling, all against a scripted gateway and an
//! in-memory paper source.

use async_trait::async_trait;
use chrono::NaiveDate;
use paperscope_cache::StageCache;
use paperscope_core::error::{Error, SourceError};
use paperscope_core::paper::{Dataset, PaperRecord};
use paperscope_core::source::PaperSource;
use paperscope_core::stage::{RunOutcome, Stage};
use paperscope_gateway::ScriptedGateway;
use paperscope_pipeline::Pipeline;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const TIERS_REPLY: &str = "Here is the result:\n```json\n{\"tier1\":[\"2501.00003\"],\"tier2\":[\"2501.00001\"],\"skip\":[\"2501.00002\"]}\n```";
const REPORT_REPLY: &str = "# arXiv triage 2025-01-08\n\n## Tier 1\n- Paper 2501.00003\n";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
}

fn paper(id: &str) -> PaperRecord {
    PaperRecord {
        id: id.into(),
        title: format!("Paper {id}"),
        abstract_text: format!("Abstract of {id}."),
        authors: String::new(),
        category: "quant-ph".into(),
        url: format!("https://arxiv.org/abs/{id}"),
        pdf: String::new(),
    }
}

/// In-memory source serving a fixed paper list, counting fetches.
struct StaticSource {
    papers: Vec<PaperRecord>,
    fetches: AtomicUsize,
}

impl StaticSource {
    fn new(papers: Vec<PaperRecord>) -> Arc<Self> {
        Arc::new(Self {
            papers,
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaperSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, date: NaiveDate) -> Result<Dataset, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Dataset::new(
            date,
            vec!["quant-ph".into()],
            self.papers.clone(),
        ))
    }
}

fn three_papers() -> Vec<PaperRecord> {
    vec![
        paper("2501.00003"),
        paper("2501.00002"),
        paper("2501.00001"),
    ]
}

fn pipeline(
    source: Arc<StaticSource>,
    gateway: Arc<ScriptedGateway>,
    dir: &TempDir,
) -> Pipeline {
    Pipeline::new(
        source,
        gateway,
        StageCache::new(dir.path()),
        "test-model",
        "tensor networks and quantum error correction",
    )
}

#[tokio::test]
async fn full_run_completes_and_updates_latest() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source.clone(), gateway.clone(), &dir);

    let outcome = pipe.run(date(), false).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Done {
            tier1: 1,
            tier2: 1,
            skipped: 1
        }
    );

    let cache = StageCache::new(dir.path());
    assert!(cache.has(date(), Stage::Fetch));
    assert!(cache.has(date(), Stage::Filter));
    assert_eq!(cache.load_report(date()).unwrap(), REPORT_REPLY);
    assert_eq!(cache.latest(), Some(date()));
    assert_eq!(gateway.calls(), 2);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn second_run_is_a_no_op_with_identical_artifacts() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source.clone(), gateway.clone(), &dir);

    pipe.run(date(), false).await.unwrap();
    let cache = StageCache::new(dir.path());
    let tiers_before = std::fs::read(cache.artifact_path(date(), Stage::Filter)).unwrap();
    let report_before = std::fs::read(cache.artifact_path(date(), Stage::Review)).unwrap();

    // Second run: no fetch, no gateway calls, byte-identical artifacts.
    let outcome = pipe.run(date(), false).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Done { .. }));
    assert_eq!(gateway.calls(), 2);
    assert_eq!(source.fetches(), 1);
    assert_eq!(
        std::fs::read(cache.artifact_path(date(), Stage::Filter)).unwrap(),
        tiers_before
    );
    assert_eq!(
        std::fs::read(cache.artifact_path(date(), Stage::Review)).unwrap(),
        report_before
    );
}

#[tokio::test]
async fn second_pass_sees_only_promoted_papers_in_dataset_order() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source, gateway.clone(), &dir);

    pipe.run(date(), false).await.unwrap();

    let review_prompt = &gateway.prompts()[1];
    // Promoted: 00003 (tier1) and 00001 (tier2), in dataset order
    let pos_3 = review_prompt.find("2501.00003").unwrap();
    let pos_1 = review_prompt.find("2501.00001").unwrap();
    assert!(pos_3 < pos_1);
    // The skipped paper's abstract never reaches the second pass
    assert!(!review_prompt.contains("Abstract of 2501.00002."));
    // Promoted papers arrive with full abstracts
    assert!(review_prompt.contains("Abstract of 2501.00003."));
}

#[tokio::test]
async fn title_filter_prompt_excludes_abstracts() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source, gateway.clone(), &dir);

    pipe.run(date(), false).await.unwrap();

    let filter_prompt = &gateway.prompts()[0];
    assert!(filter_prompt.contains("2501.00002"));
    assert!(!filter_prompt.contains("Abstract of"));
}

#[tokio::test]
async fn overridden_template_reaches_the_gateway() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source, gateway.clone(), &dir)
        .with_title_template("CLASSIFY FOR {DATE}: {TITLES_JSON}");

    pipe.run(date(), false).await.unwrap();

    let filter_prompt = &gateway.prompts()[0];
    assert!(filter_prompt.starts_with("CLASSIFY FOR 2025-01-08:"));
    assert!(filter_prompt.contains("2501.00001"));
}

#[tokio::test]
async fn empty_dataset_is_terminal_success_with_zero_gateway_calls() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(vec![]);
    let gateway = Arc::new(ScriptedGateway::unreachable());
    let pipe = pipeline(source, gateway.clone(), &dir);

    let outcome = pipe.run(date(), false).await.unwrap();
    assert_eq!(outcome, RunOutcome::Empty);
    assert_eq!(gateway.calls(), 0);

    let report = StageCache::new(dir.path()).load_report(date()).unwrap();
    assert!(report.contains("No new papers"));
}

#[tokio::test]
async fn dry_run_caches_dataset_and_stops() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::unreachable());
    let pipe = pipeline(source, gateway.clone(), &dir);

    let outcome = pipe.run(date(), true).await.unwrap();
    assert_eq!(outcome, RunOutcome::DryRun { count: 3 });
    assert_eq!(gateway.calls(), 0);
    assert!(StageCache::new(dir.path()).has(date(), Stage::Fetch));
}

#[tokio::test]
async fn rerunning_an_older_date_does_not_move_latest_backwards() {
    let dir = TempDir::new().unwrap();
    let older = date();
    let newer = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
    let source = StaticSource::new(three_papers());

    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    pipeline(source.clone(), gateway, &dir)
        .run(older, false)
        .await
        .unwrap();

    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    pipeline(source.clone(), gateway, &dir)
        .run(newer, false)
        .await
        .unwrap();
    assert_eq!(StageCache::new(dir.path()).latest(), Some(newer));

    // Re-invoking the completed older date is a no-op and must leave the
    // pointer on the newest report.
    let gateway = Arc::new(ScriptedGateway::unreachable());
    let outcome = pipeline(source, gateway.clone(), &dir)
        .run(older, false)
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Done { .. }));
    assert_eq!(gateway.calls(), 0);
    assert_eq!(StageCache::new(dir.path()).latest(), Some(newer));
}

#[tokio::test]
async fn dry_run_of_an_empty_date_writes_no_report() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(vec![]);
    let gateway = Arc::new(ScriptedGateway::unreachable());
    let pipe = pipeline(source, gateway.clone(), &dir);

    let outcome = pipe.run(date(), true).await.unwrap();
    assert_eq!(outcome, RunOutcome::DryRun { count: 0 });
    assert_eq!(gateway.calls(), 0);

    let cache = StageCache::new(dir.path());
    assert!(cache.has(date(), Stage::Fetch));
    assert!(cache.load_report(date()).is_none());

    // The later full run reaches the empty terminal and writes the report.
    let outcome = pipe.run(date(), false).await.unwrap();
    assert_eq!(outcome, RunOutcome::Empty);
    assert!(cache.load_report(date()).unwrap().contains("No new papers"));
}

#[tokio::test]
async fn extraction_failure_blocks_preserves_raw_and_is_resumable() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new(["I cannot classify these papers."]));
    let pipe = pipeline(source.clone(), gateway.clone(), &dir);

    let err = pipe.run(date(), false).await.unwrap_err();
    assert!(matches!(err, Error::Extraction(_)));

    let cache = StageCache::new(dir.path());
    // No invalid cache entry written; the raw reply is preserved
    assert!(!cache.has(date(), Stage::Filter));
    let rejected = dir.path().join("2025-01-08").join("rejected-filter.txt");
    assert_eq!(
        std::fs::read_to_string(rejected).unwrap(),
        "I cannot classify these papers."
    );
    assert!(cache.latest().is_none());

    // A later run resumes from the cached dataset: one fetch total, and the
    // filter stage runs again.
    let gateway2 = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe2 = pipeline(source.clone(), gateway2.clone(), &dir);
    pipe2.run(date(), false).await.unwrap();
    assert_eq!(source.fetches(), 1);
    assert_eq!(gateway2.calls(), 2);
}

#[tokio::test]
async fn valid_filter_cache_means_exactly_one_review_call() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());

    // First run dies after the filter stage (script exhausted).
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY]));
    let pipe = pipeline(source.clone(), gateway.clone(), &dir);
    let err = pipe.run(date(), false).await.unwrap_err();
    assert!(matches!(err, Error::Gateway(_)));
    assert!(StageCache::new(dir.path()).has(date(), Stage::Filter));

    // Rerun: stage 2 only — exactly one gateway call.
    let gateway2 = Arc::new(ScriptedGateway::new([REPORT_REPLY]));
    let pipe2 = pipeline(source.clone(), gateway2.clone(), &dir);
    let outcome = pipe2.run(date(), false).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Done { .. }));
    assert_eq!(gateway2.calls(), 1);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn all_skip_classification_writes_zero_candidate_report() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let all_skip = "{\"tier1\":[],\"tier2\":[],\"skip\":[\"2501.00003\",\"2501.00002\",\"2501.00001\"]}";
    let gateway = Arc::new(ScriptedGateway::new([all_skip]));
    let pipe = pipeline(source, gateway.clone(), &dir);

    let outcome = pipe.run(date(), false).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Done {
            tier1: 0,
            tier2: 0,
            skipped: 3
        }
    );
    // Only the filter pass hit the gateway; the report was synthesized.
    assert_eq!(gateway.calls(), 1);

    let report = StageCache::new(dir.path()).load_report(date()).unwrap();
    assert!(report.contains("Zero candidate papers"));
    assert!(report.contains("all 3"));
}

#[tokio::test]
async fn corrupted_tier_cache_forces_recomputation() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(three_papers());
    let gateway = Arc::new(ScriptedGateway::new([TIERS_REPLY, REPORT_REPLY]));
    let pipe = pipeline(source, gateway.clone(), &dir);

    // Plant a corrupted filter artifact before the first run.
    let cache = StageCache::new(dir.path());
    let tiers_path = cache.artifact_path(date(), Stage::Filter);
    std::fs::create_dir_all(tiers_path.parent().unwrap()).unwrap();
    std::fs::write(&tiers_path, "{ not json").unwrap();

    // The invalid entry cannot short-circuit the stage: it is sidelined and
    // the filter runs for real.
    let outcome = pipe.run(date(), false).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Done { .. }));
    assert_eq!(gateway.calls(), 2);
    assert!(tiers_path.with_extension("json.invalid").exists());
    // The recomputed entry is the valid one.
    let stored = std::fs::read_to_string(&tiers_path).unwrap();
    assert!(stored.contains("2501.00003"));
}

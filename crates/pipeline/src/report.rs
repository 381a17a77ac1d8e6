//! Locally synthesized reports and the final status line.
//!
//! Stage 2 normally persists the model's markdown verbatim. The two cases
//! with nothing to review — an empty dataset, or a day where nothing was
//! promoted — still produce a report, written here without a gateway call,
//! so `show` always has something to print for a completed date.

use chrono::NaiveDate;
use paperscope_core::stage::RunOutcome;

/// Report for a date with zero fetched papers (e.g. a weekend).
pub fn empty_dataset_report(date: NaiveDate) -> String {
    format!(
        "# arXiv triage {date}\n\nNo new papers were published for this date.\n"
    )
}

/// Report for a non-empty dataset where the title filter promoted nothing.
pub fn zero_candidates_report(date: NaiveDate, skipped: usize) -> String {
    format!(
        "# arXiv triage {date}\n\nZero candidate papers today: all {skipped} new \
         submissions were classified as skip.\n"
    )
}

/// One-line human-readable summary of a finished run.
pub fn status_line(date: NaiveDate, outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Done {
            tier1,
            tier2,
            skipped,
        } => format!("{date}: tier1 {tier1}, tier2 {tier2}, skipped {skipped}"),
        RunOutcome::Empty => format!("{date}: no papers"),
        RunOutcome::DryRun { count } => format!("{date}: fetched {count} papers (dry run)"),
    }
}

//! Prompt rendering — template substitution over the day's data.
//!
//! Templates are embedded in the binary. Substitution is plain string
//! replacement over a handful of named placeholders; the model never sees
//! anything but the final text.
//!
//! The title-filter payload is deliberately minimal: id, title, and category
//! only, as compact JSON, so the cheap first pass stays cheap. Abstracts
//! appear only in the second pass, and only for promoted papers.

use chrono::NaiveDate;
use paperscope_core::paper::{Dataset, PaperRecord};
use serde::Serialize;

pub const TITLE_FILTER_TEMPLATE: &str = include_str!("../templates/title_filter.md");
pub const ABSTRACT_REVIEW_TEMPLATE: &str = include_str!("../templates/abstract_review.md");

/// The minimal per-paper payload for the title filter.
#[derive(Serialize)]
struct TitleEntry<'a> {
    id: &'a str,
    title: &'a str,
    cat: &'a str,
}

/// Render the first-pass prompt: titles only, compact JSON.
pub fn render_title_filter(
    template: &str,
    dataset: &Dataset,
    interests: &str,
) -> Result<String, serde_json::Error> {
    let titles: Vec<TitleEntry<'_>> = dataset
        .papers
        .iter()
        .map(|p| TitleEntry {
            id: &p.id,
            title: &p.title,
            cat: &p.category,
        })
        .collect();

    let titles_json = serde_json::to_string(&titles)?;

    Ok(template
        .replace("{INTERESTS}", interests)
        .replace("{TITLES_JSON}", &titles_json)
        .replace("{DATE}", &dataset.date.format("%Y-%m-%d").to_string()))
}

/// Render the second-pass prompt over the promoted subset, full abstracts
/// included.
pub fn render_abstract_review(
    template: &str,
    papers: &[&PaperRecord],
    date: NaiveDate,
    interests: &str,
) -> Result<String, serde_json::Error> {
    let papers_json = serde_json::to_string_pretty(papers)?;

    Ok(template
        .replace("{INTERESTS}", interests)
        .replace("{PAPERS_JSON}", &papers_json)
        .replace("{DATE}", &date.format("%Y-%m-%d").to_string()))
}

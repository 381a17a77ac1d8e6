//! arXiv RSS parsing.
//!
//! The feed is flat enough that a full XML parser buys nothing: each
//! `<item>` holds a title, a link, a description (the abstract), and a
//! `<dc:creator>` author list. Items without a recognizable arXiv id in
//! their link are dropped.

use paperscope_core::paper::PaperRecord;
use regex_lite::Regex;
use std::sync::LazyLock;

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item>(.*?)</item>").unwrap());
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<link>(.*?)</link>").unwrap());
static DESC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<description>(.*?)</description>").unwrap());
static CREATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<dc:creator>(.*?)</dc:creator>").unwrap());
static ARXIV_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"arxiv\.org/(?:abs|pdf)/([0-9]+\.[0-9]+)").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// Titles sometimes carry a trailing "(arXiv:2501.04567 [quant-ph])" suffix
static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(arXiv:[^)]+\)\s*$").unwrap());

/// Parse a category's RSS feed into paper records, in feed order.
pub fn parse_feed(xml: &str, category: &str) -> Vec<PaperRecord> {
    ITEM_RE
        .captures_iter(xml)
        .filter_map(|cap| parse_item(cap.get(1).map_or("", |m| m.as_str()), category))
        .collect()
}

fn parse_item(item: &str, category: &str) -> Option<PaperRecord> {
    let link = first_capture(&LINK_RE, item)?;
    let id = extract_arxiv_id(&link)?;

    let mut title = clean_text(&first_capture(&TITLE_RE, item)?);
    title = TITLE_SUFFIX_RE.replace(&title, "").into_owned();
    if title.is_empty() {
        return None;
    }

    let abstract_text = first_capture(&DESC_RE, item)
        .map(|d| clean_text(&d))
        .unwrap_or_default();
    let authors = first_capture(&CREATOR_RE, item)
        .map(|a| clean_text(&a))
        .unwrap_or_default();

    Some(PaperRecord {
        url: format!("https://arxiv.org/abs/{id}"),
        pdf: format!("https://arxiv.org/pdf/{id}.pdf"),
        id,
        title,
        abstract_text,
        authors,
        category: category.into(),
    })
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the arXiv id from an abs/pdf URL.
fn extract_arxiv_id(link: &str) -> Option<String> {
    ARXIV_ID_RE
        .captures(link)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strip CDATA wrappers, HTML entities and tags, and normalize whitespace.
fn clean_text(text: &str) -> String {
    let text = text
        .trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>");
    let text = unescape_entities(text);
    let text = TAG_RE.replace_all(&text, "");
    WS_RE.replace_all(text.trim(), " ").into_owned()
}

fn unescape_entities(text: &str) -> String {
    // &amp; last, so "&amp;lt;" decodes to the literal "&lt;"
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

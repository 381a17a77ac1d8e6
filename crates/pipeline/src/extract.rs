//! Response extraction — structure recovery from free-form model replies.
//!
//! The gateway guarantees nothing about its output format. Replies usually
//! contain the requested JSON object, but often wrapped in markdown code
//! fences, prefixed with prose ("Here is the classification:"), or followed
//! by commentary. The grammar here is deliberately simple:
//!
//! 1. drop every line that is purely a fence marker (starts with ```)
//! 2. take the span from the first line that opens an object (`{`)
//!    through the last line that closes one (`}`)
//! 3. parse the span as JSON and validate against the dataset
//!
//! Pure function, no side effects; the caller preserves the raw text on
//! failure and decides what to do with it.

use paperscope_core::error::ExtractionError;
use paperscope_core::paper::Dataset;
use paperscope_core::tiers::TierAssignment;

/// Recover a validated `TierAssignment` from a raw gateway reply.
pub fn extract_tier_assignment(
    raw: &str,
    dataset: &Dataset,
) -> Result<TierAssignment, ExtractionError> {
    let span = object_span(raw).ok_or(ExtractionError::NoObject)?;

    let tiers: TierAssignment =
        serde_json::from_str(&span).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    tiers.validate(dataset)?;
    Ok(tiers)
}

/// The candidate JSON span: first `{`-opening line through last `}`-closing
/// line, fence lines removed.
fn object_span(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.lines().filter(|l| !is_fence(l)).collect();

    let start = lines.iter().position(|l| l.trim_start().starts_with('{'))?;
    let end = lines.iter().rposition(|l| l.trim_end().ends_with('}'))?;
    if end < start {
        return None;
    }

    Some(lines[start..=end].join("\n"))
}

/// A line that is only a fence marker, with or without a language tag.
fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

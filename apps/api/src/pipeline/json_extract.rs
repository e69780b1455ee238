//! Best-effort recovery of a JSON object from free-text model output.
//!
//! The algorithm is deliberately naive and must stay that way: the candidate is
//! the span from the first `{` to the last `}` (inclusive). Nested objects work
//! because the outermost braces win; prose containing stray braces does not.

use serde_json::Value;
use tracing::warn;

use crate::pipeline::state::FitAssessment;

/// Returns the JSON candidate inside `text`.
///
/// - both delimiters present, `{` before `}`: the inclusive span between them
/// - either delimiter missing: the whole text
/// - last `}` before first `{`: the empty string (which never decodes)
pub fn extract_json_candidate(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &text[start..=end],
        (Some(_), Some(_)) => "",
        _ => text,
    }
}

/// Decodes a ScoreFit response.
///
/// Only a candidate that is not valid JSON (or is valid JSON but not an object)
/// degrades to the `Unknown` sentinel. A decoded object is mapped field by
/// field, so an off-shape field never discards the rest.
pub fn parse_fit_assessment(raw: &str) -> FitAssessment {
    let candidate = extract_json_candidate(raw);
    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value,
        Err(e) => {
            warn!("Fit response was not valid JSON ({e}); using fallback assessment");
            return FitAssessment::unparsed(raw);
        }
    };
    FitAssessment::from_json(&value).unwrap_or_else(|| {
        warn!("Fit response was JSON but not an object; using fallback assessment");
        FitAssessment::unparsed(raw)
    })
}

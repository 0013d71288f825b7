//! Critique Parser: pulls verdict, score and feedback out of a model critique.
//!
//! Missing fields degrade to defaults instead of failing: verdict "N/A",
//! score 0.0, feedback = the whole raw text. The parsed score is not bounded here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::llm_client::strip_json_fences;

pub const DEFAULT_VERDICT: &str = "N/A";

static VERDICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\*\*)?Verdict:(?:\*\*)?\s*([^\r\n]*)").expect("verdict regex is valid")
});

static SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\*\*)?Overall Score:(?:\*\*)?\s*(\d{1,3})").expect("score regex is valid")
});

static FEEDBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:\*\*)?Actionable Feedback:(?:\*\*)?(.*)").expect("feedback regex is valid")
});

/// Parsed critique fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub verdict: String,
    pub score: f64,
    pub feedback: String,
}

/// JSON form requested by the structured critique prompt.
#[derive(Debug, Deserialize)]
struct StructuredCritique {
    verdict: Option<String>,
    overall_score: Option<f64>,
    actionable_feedback: Option<String>,
}

/// Parses a raw critique. JSON output is read field by field; anything else
/// goes through the labeled-section patterns.
pub fn parse_critique(raw: &str) -> CritiqueResult {
    if let Some(parsed) = parse_structured(raw) {
        return parsed;
    }

    let verdict = VERDICT_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_VERDICT.to_string());

    let score = SCORE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    let feedback = FEEDBACK_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| raw.to_string());

    CritiqueResult {
        verdict,
        score,
        feedback,
    }
}

fn parse_structured(raw: &str) -> Option<CritiqueResult> {
    let text = strip_json_fences(raw);
    if !text.starts_with('{') {
        return None;
    }
    let structured: StructuredCritique = serde_json::from_str(text).ok()?;

    Some(CritiqueResult {
        verdict: structured
            .verdict
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERDICT.to_string()),
        score: structured.overall_score.unwrap_or(0.0),
        feedback: structured
            .actionable_feedback
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| raw.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "**Verdict:** Good Fit\n\
        **Overall Score:** 78\n\
        **Actionable Feedback:**\n\
        * **Strengths:** Strong Python background.\n\
        * **Areas for Improvement:** Mention AWS.\n";

    #[test]
    fn test_parses_all_three_sections() {
        let parsed = parse_critique(WELL_FORMED);
        assert_eq!(parsed.verdict, "Good Fit");
        assert_eq!(parsed.score, 78.0);
        assert!(parsed.feedback.starts_with("* **Strengths:**"));
        assert!(parsed.feedback.ends_with("Mention AWS."));
    }

    #[test]
    fn test_labels_without_bold_markers() {
        let parsed = parse_critique("Verdict: Poor Match\nOverall Score: 12\nActionable Feedback: Add projects.");
        assert_eq!(parsed.verdict, "Poor Match");
        assert_eq!(parsed.score, 12.0);
        assert_eq!(parsed.feedback, "Add projects.");
    }

    #[test]
    fn test_missing_everything_falls_back_to_defaults() {
        let raw = "Could not generate AI feedback: connection refused";
        let parsed = parse_critique(raw);
        assert_eq!(parsed.verdict, DEFAULT_VERDICT);
        assert_eq!(parsed.score, 0.0);
        assert_eq!(parsed.feedback, raw);
    }

    #[test]
    fn test_missing_score_is_zero_but_verdict_kept() {
        let parsed = parse_critique("**Verdict:** Needs Improvement\nno score here");
        assert_eq!(parsed.score, 0.0);
        assert_eq!(parsed.verdict, "Needs Improvement");
    }

    #[test]
    fn test_score_is_not_capped() {
        let parsed = parse_critique("**Overall Score:** 999");
        assert_eq!(parsed.score, 999.0);
    }

    #[test]
    fn test_score_takes_at_most_three_digits() {
        let parsed = parse_critique("**Overall Score:** 12345");
        assert_eq!(parsed.score, 123.0);
    }

    #[test]
    fn test_verdict_on_following_line() {
        let parsed = parse_critique("**Verdict:**\nGood Fit\n**Overall Score:** 70");
        assert_eq!(parsed.verdict, "Good Fit");
        assert_eq!(parsed.score, 70.0);
    }

    #[test]
    fn test_blank_verdict_uses_default() {
        let parsed = parse_critique("**Verdict:**   ");
        assert_eq!(parsed.verdict, DEFAULT_VERDICT);
    }

    #[test]
    fn test_first_verdict_wins() {
        let parsed = parse_critique("Verdict: Excellent Match\nVerdict: Poor Match");
        assert_eq!(parsed.verdict, "Excellent Match");
    }

    #[test]
    fn test_feedback_spans_newlines() {
        let parsed = parse_critique("Actionable Feedback:\nline one\n\nline two\n");
        assert_eq!(parsed.feedback, "line one\n\nline two");
    }

    #[test]
    fn test_structured_json_is_read_directly() {
        let raw = "```json\n{\"verdict\": \"Good Fit\", \"overall_score\": 81, \"actionable_feedback\": \"Quantify impact.\"}\n```";
        let parsed = parse_critique(raw);
        assert_eq!(parsed.verdict, "Good Fit");
        assert_eq!(parsed.score, 81.0);
        assert_eq!(parsed.feedback, "Quantify impact.");
    }

    #[test]
    fn test_structured_json_missing_fields_use_defaults() {
        let parsed = parse_critique("{\"overall_score\": 40}");
        assert_eq!(parsed.verdict, DEFAULT_VERDICT);
        assert_eq!(parsed.score, 40.0);
        assert_eq!(parsed.feedback, "{\"overall_score\": 40}");
    }
}

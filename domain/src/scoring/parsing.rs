//! Judge output parsing
//!
//! The judge is asked for one JSON object:
//!
//! ```json
//! {
//!   "summary": "agent-2 is the most accurate",
//!   "scores": [
//!     {
//!       "agent_id": "agent-1",
//!       "accuracy": 7, "completeness": 6, "clarity": 8, "insight": 5,
//!       "reasoning": "solid but shallow",
//!       "evidence": {
//!         "accuracy": { "quote": "...", "rationale": "..." }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Prose or code fences around the object are tolerated. Each agent entry is
//! validated on its own: a bad entry drops only that agent, which later gets a
//! fallback score.

use super::score::{Evidence, Metric, MetricEvidence, MetricScores, METRIC_MAX};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Why a judge response could not be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JudgeParseError {
    #[error("no JSON object found in judge output")]
    NoJson,

    #[error("malformed judge JSON: {0}")]
    Malformed(String),

    #[error("judge output has no usable scores: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct RawJudgeOutput {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    scores: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawAgentScore {
    agent_id: String,
    accuracy: f64,
    completeness: f64,
    clarity: f64,
    insight: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    evidence: HashMap<String, RawEvidence>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvidence {
    #[serde(default)]
    quote: String,
    #[serde(default)]
    rationale: String,
}

/// One validated agent entry
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAgentScore {
    pub metrics: MetricScores,
    pub reasoning: String,
    pub evidence: MetricEvidence,
}

/// Validated judge output, keyed by agent id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedJudgeOutput {
    pub summary: String,
    pub scores: HashMap<String, ParsedAgentScore>,
    /// `(agent_id or index, reason)` for entries that were dropped
    pub rejected: Vec<(String, String)>,
}

impl ParsedJudgeOutput {
    pub fn get(&self, agent_id: &str) -> Option<&ParsedAgentScore> {
        self.scores.get(agent_id)
    }
}

/// Slice from the first `{` to the last `}`
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Bodies of ` ```json ` and untagged ` ``` ` blocks, in order
fn fenced_blocks(raw: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = raw;
    while let Some(open) = rest.find("```") {
        let after = &rest[open + 3..];
        let Some(newline) = after.find('\n') else {
            break;
        };
        let lang = after[..newline].trim();
        let body = &after[newline + 1..];
        let Some(close) = body.find("```") else {
            break;
        };
        if lang.is_empty() || lang.eq_ignore_ascii_case("json") {
            blocks.push(body[..close].trim());
        }
        rest = &body[close + 3..];
    }
    blocks
}

/// Decode the judge object, trying fenced blocks, then the whole reply,
/// then the outermost brace slice. A candidate with scores wins over one
/// without.
fn decode_judge_json(raw: &str) -> Result<RawJudgeOutput, JudgeParseError> {
    if !raw.contains('{') {
        return Err(JudgeParseError::NoJson);
    }

    let mut candidates = fenced_blocks(raw);
    candidates.push(raw.trim());
    candidates.extend(extract_json_object(raw));

    let mut without_scores = None;
    let mut first_error = None;
    for candidate in candidates {
        match serde_json::from_str::<RawJudgeOutput>(candidate) {
            Ok(output) if !output.scores.is_empty() => return Ok(output),
            Ok(output) => {
                without_scores.get_or_insert(output);
            }
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    match (without_scores, first_error) {
        (Some(output), _) => Ok(output),
        (None, Some(e)) => Err(JudgeParseError::Malformed(e)),
        (None, None) => Err(JudgeParseError::NoJson),
    }
}

/// Parse and validate a judge response against the expected agent ids.
///
/// Entries for unknown agents are rejected. Fails with
/// [`JudgeParseError::Invalid`] when no entry survives validation.
pub fn parse_judge_response(
    raw: &str,
    agent_ids: &[String],
) -> Result<ParsedJudgeOutput, JudgeParseError> {
    let output = decode_judge_json(raw)?;

    let mut parsed = ParsedJudgeOutput {
        summary: output.summary.trim().to_string(),
        ..Default::default()
    };

    for (index, value) in output.scores.into_iter().enumerate() {
        let entry: RawAgentScore = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                parsed.rejected.push((format!("#{}", index), e.to_string()));
                continue;
            }
        };

        let agent_id = entry.agent_id.trim().to_string();
        if !agent_ids.contains(&agent_id) {
            parsed
                .rejected
                .push((agent_id, "unknown agent id".to_string()));
            continue;
        }
        if parsed.scores.contains_key(&agent_id) {
            parsed
                .rejected
                .push((agent_id, "duplicate entry".to_string()));
            continue;
        }

        match validate_entry(entry) {
            Ok(score) => {
                parsed.scores.insert(agent_id, score);
            }
            Err(reason) => parsed.rejected.push((agent_id, reason)),
        }
    }

    if parsed.scores.is_empty() {
        let reason = if parsed.rejected.is_empty() {
            "scores list is empty".to_string()
        } else {
            format!("{} entries rejected", parsed.rejected.len())
        };
        return Err(JudgeParseError::Invalid(reason));
    }

    Ok(parsed)
}

fn validate_entry(entry: RawAgentScore) -> Result<ParsedAgentScore, String> {
    let values = [
        (Metric::Accuracy, entry.accuracy),
        (Metric::Completeness, entry.completeness),
        (Metric::Clarity, entry.clarity),
        (Metric::Insight, entry.insight),
    ];
    for (metric, value) in values {
        if !value.is_finite() || !(0.0..=METRIC_MAX).contains(&value) {
            return Err(format!("{} out of range: {}", metric, value));
        }
    }

    let mut raw_evidence = entry.evidence;
    let mut evidence = MetricEvidence::placeholder();
    for metric in Metric::ALL {
        if let Some(raw) = raw_evidence.remove(metric.as_str())
            && !raw.quote.trim().is_empty()
            && !raw.rationale.trim().is_empty()
        {
            *evidence.get_mut(metric) = Evidence::new(raw.quote.trim(), raw.rationale.trim());
        }
    }

    Ok(ParsedAgentScore {
        metrics: MetricScores::new(entry.accuracy, entry.completeness, entry.clarity, entry.insight),
        reasoning: entry.reasoning.trim().to_string(),
        evidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents() -> Vec<String> {
        vec!["agent-1".to_string(), "agent-2".to_string()]
    }

    const VALID: &str = r#"Here is my verdict:
```json
{
  "summary": "agent-1 is more precise",
  "scores": [
    {"agent_id": "agent-1", "accuracy": 8, "completeness": 7, "clarity": 9, "insight": 6,
     "reasoning": "precise",
     "evidence": {
       "accuracy": {"quote": "O(n log n)", "rationale": "correct bound"},
       "clarity": {"quote": "", "rationale": "empty quote"}
     }},
    {"agent_id": "agent-2", "accuracy": 6.5, "completeness": 6, "clarity": 7, "insight": 5}
  ]
}
```"#;

    #[test]
    fn test_parse_valid_with_fences() {
        let parsed = parse_judge_response(VALID, &agents()).unwrap();
        assert_eq!(parsed.summary, "agent-1 is more precise");
        assert_eq!(parsed.scores.len(), 2);

        let first = parsed.get("agent-1").unwrap();
        assert_eq!(first.metrics, MetricScores::new(8.0, 7.0, 9.0, 6.0));
        assert_eq!(first.evidence.accuracy.quote, "O(n log n)");
        assert!(!first.evidence.clarity.is_substantive());
        assert_eq!(first.evidence.coverage(), 0.25);

        let second = parsed.get("agent-2").unwrap();
        assert_eq!(second.evidence.coverage(), 0.0);
    }

    #[test]
    fn test_out_of_range_entry_rejected() {
        let raw = r#"{"scores": [
            {"agent_id": "agent-1", "accuracy": 10.5, "completeness": 7, "clarity": 9, "insight": 6},
            {"agent_id": "agent-2", "accuracy": 6, "completeness": 6, "clarity": 7, "insight": 5}
        ]}"#;
        let parsed = parse_judge_response(raw, &agents()).unwrap();
        assert!(parsed.get("agent-1").is_none());
        assert!(parsed.get("agent-2").is_some());
        assert_eq!(parsed.rejected.len(), 1);
    }

    #[test]
    fn test_unknown_and_duplicate_agents_rejected() {
        let raw = r#"{"scores": [
            {"agent_id": "agent-9", "accuracy": 6, "completeness": 6, "clarity": 7, "insight": 5},
            {"agent_id": "agent-1", "accuracy": 6, "completeness": 6, "clarity": 7, "insight": 5},
            {"agent_id": "agent-1", "accuracy": 9, "completeness": 9, "clarity": 9, "insight": 9}
        ]}"#;
        let parsed = parse_judge_response(raw, &agents()).unwrap();
        assert_eq!(parsed.get("agent-1").unwrap().metrics.accuracy, 6.0);
        assert_eq!(parsed.rejected.len(), 2);
    }

    #[test]
    fn test_missing_metric_rejects_entry() {
        let raw = r#"{"scores": [{"agent_id": "agent-1", "accuracy": 6, "clarity": 7, "insight": 5}]}"#;
        assert!(matches!(
            parse_judge_response(raw, &agents()),
            Err(JudgeParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_no_json() {
        assert_eq!(
            parse_judge_response("agent-1 wins, obviously", &agents()),
            Err(JudgeParseError::NoJson)
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_judge_response("{ scores: [ }", &agents()),
            Err(JudgeParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_object("} {"), None);
        assert_eq!(extract_json_object("none"), None);
    }

    #[test]
    fn test_brace_in_preamble_before_fenced_verdict() {
        let raw = format!(
            "agent-2 forgot the empty-map case `{{}}`.\n{}",
            VALID.trim_start_matches("Here is my verdict:\n")
        );
        let parsed = parse_judge_response(&raw, &agents()).unwrap();
        assert_eq!(parsed.scores.len(), 2);
        assert_eq!(parsed.summary, "agent-1 is more precise");
    }

    #[test]
    fn test_fenced_block_with_scores_preferred() {
        let raw = r#"An empty result looks like this:
```json
{}
```
Verdict:
```
{"scores": [{"agent_id": "agent-2", "accuracy": 6, "completeness": 6, "clarity": 7, "insight": 5}]}
```"#;
        let parsed = parse_judge_response(raw, &agents()).unwrap();
        assert!(parsed.get("agent-2").is_some());
    }
}

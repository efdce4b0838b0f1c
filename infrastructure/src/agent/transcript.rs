//! Parsing of agent replies into reasoning steps and a final answer
//!
//! Agents are asked to reply with `Step N: ...` lines followed by a
//! `Final Answer:` heading. Models drift from the format (markdown bullets,
//! bold markers, wrapped lines), so parsing is lenient.

use arena_domain::prompt::{FINAL_ANSWER_MARKER, STEP_PREFIX};

/// One parsed reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    /// Step thoughts in order, without their `Step N:` prefix
    pub steps: Vec<String>,
    /// Text after the final-answer marker, if the marker was present
    pub final_answer: Option<String>,
}

/// Split a reply into steps and final answer.
///
/// Lines that do not start a step continue the previous one. Text before
/// the first step is ignored.
pub fn parse_transcript(text: &str) -> Transcript {
    let (reasoning, final_answer) = match find_marker(text) {
        Some((start, end)) => {
            let answer = text[end..].trim().trim_start_matches('*').trim().to_string();
            (&text[..start], Some(answer).filter(|a| !a.is_empty()))
        }
        None => (text, None),
    };

    let mut steps: Vec<String> = Vec::new();
    for line in reasoning.lines() {
        let line = strip_decoration(line);
        if line.is_empty() {
            continue;
        }
        if let Some(thought) = step_thought(line) {
            if !thought.is_empty() {
                steps.push(thought.to_string());
            }
        } else if let Some(last) = steps.last_mut() {
            last.push(' ');
            last.push_str(line);
        }
    }

    Transcript {
        steps,
        final_answer,
    }
}

/// Byte range of the final-answer marker, case-insensitive.
///
/// ASCII lowercasing keeps byte offsets identical to `text`.
fn find_marker(text: &str) -> Option<(usize, usize)> {
    let lower = text.to_ascii_lowercase();
    let marker = FINAL_ANSWER_MARKER.to_ascii_lowercase();
    lower.rfind(&marker).map(|i| (i, i + marker.len()))
}

fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '>') || c.is_whitespace())
        .trim_end()
}

/// `Step 3: thought`, `Step 3. thought`, `**Step 3:** thought`
fn step_thought(line: &str) -> Option<&str> {
    let head = line.get(..STEP_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(STEP_PREFIX) {
        return None;
    }
    let rest = line[STEP_PREFIX.len()..].trim_start();
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = rest[digits..].trim_start_matches('*').trim_start();
    let rest = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('.'))
        .or_else(|| rest.strip_prefix(')'))?;
    Some(rest.trim_start_matches('*').trim())
}

//! Locating judge evidence quotes inside agent responses

use super::score::EvidenceSpan;
use crate::core::string::collapse_whitespace;

/// Find `quote` in `response`, returning its char span.
///
/// Tries an exact substring match first, then retries with all whitespace
/// collapsed in both texts; the collapsed match is mapped back to offsets
/// in the original response. Returns `None` when neither matches.
pub fn locate_quote(quote: &str, response: &str) -> Option<EvidenceSpan> {
    let quote = quote.trim();
    if quote.is_empty() {
        return None;
    }

    if let Some(byte_pos) = response.find(quote) {
        let start = response[..byte_pos].chars().count();
        return Some(EvidenceSpan {
            start,
            end: start + quote.chars().count(),
        });
    }

    locate_collapsed(quote, response)
}

fn locate_collapsed(quote: &str, response: &str) -> Option<EvidenceSpan> {
    let needle = collapse_whitespace(quote);
    if needle.is_empty() {
        return None;
    }

    // collapsed char index -> original char index
    let mut collapsed = String::with_capacity(response.len());
    let mut origin: Vec<usize> = Vec::with_capacity(response.len());
    let mut pending_space: Option<usize> = None;

    for (idx, ch) in response.chars().enumerate() {
        if ch.is_whitespace() {
            if !collapsed.is_empty() && pending_space.is_none() {
                pending_space = Some(idx);
            }
            continue;
        }
        if let Some(space_idx) = pending_space.take() {
            collapsed.push(' ');
            origin.push(space_idx);
        }
        collapsed.push(ch);
        origin.push(idx);
    }

    let byte_pos = collapsed.find(&needle)?;
    let start_c = collapsed[..byte_pos].chars().count();
    let len_c = needle.chars().count();
    let last = *origin.get(start_c + len_c - 1)?;

    Some(EvidenceSpan {
        start: *origin.get(start_c)?,
        end: last + 1,
    })
}

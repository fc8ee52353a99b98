//! Split overlong transcript segments at token or midpoint boundaries.

use super::is_unspaced_script;
use crate::policy::OptimizationPolicy;
use crate::types::{TranscriptSegment, TranscriptToken};
use std::time::Duration;

/// Split every segment longer than `split_threshold`.
pub fn split(segments: Vec<TranscriptSegment>, policy: &OptimizationPolicy) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .flat_map(|segment| split_segment(segment, policy))
        .collect()
}

/// Recursively bisect a segment until each piece fits the threshold.
///
/// A segment is left whole when it cannot be bisected or a half would be
/// empty or shorter than `min_duration`.
fn split_segment(segment: TranscriptSegment, policy: &OptimizationPolicy) -> Vec<TranscriptSegment> {
    if segment.duration() <= policy.split_threshold {
        return vec![segment];
    }

    let Some((left, right)) = bisect(&segment) else {
        return vec![segment];
    };

    let too_short = |half: &TranscriptSegment| {
        half.is_degenerate() || half.duration() < policy.min_duration
    };
    if too_short(&left) || too_short(&right) {
        return vec![segment];
    }

    let mut pieces = split_segment(left, policy);
    pieces.extend(split_segment(right, policy));
    pieces
}

fn bisect(segment: &TranscriptSegment) -> Option<(TranscriptSegment, TranscriptSegment)> {
    if segment.tokens.len() >= 2 {
        bisect_at_token(segment)
    } else {
        bisect_at_midpoint(segment)
    }
}

fn midpoint(segment: &TranscriptSegment) -> Duration {
    segment.start + segment.duration() / 2
}

/// Split at the token boundary nearest the time midpoint (earliest on ties).
///
/// When tokens mark word starts with a leading space, only word starts are
/// boundaries. Boundaries leaving a half without duration are skipped.
fn bisect_at_token(segment: &TranscriptSegment) -> Option<(TranscriptSegment, TranscriptSegment)> {
    let tokens = &segment.tokens;
    let mid = midpoint(segment);

    let starts_word = |t: &TranscriptToken| t.text.starts_with(char::is_whitespace);
    let marks_words = !is_unspaced_script(&segment.text) && tokens.iter().any(starts_word);

    let bounds = |k: usize| {
        let left_end = tokens[k].end.clamp(segment.start, segment.end);
        let right_start = tokens[k + 1].start.clamp(left_end, segment.end);
        (left_end, right_start)
    };

    let k = (0..tokens.len() - 1)
        .filter(|&k| !marks_words || starts_word(&tokens[k + 1]))
        .filter(|&k| {
            let (left_end, right_start) = bounds(k);
            left_end > segment.start && right_start < segment.end
        })
        .min_by_key(|&k| tokens[k].end.abs_diff(mid))?;
    let (left_tokens, right_tokens) = tokens.split_at(k + 1);
    let (left_end, right_start) = bounds(k);

    let spaced = segment.text.contains(char::is_whitespace);
    let left_text = join_tokens(left_tokens, spaced);
    let right_text = join_tokens(right_tokens, spaced);

    if left_text.is_empty() || right_text.is_empty() {
        return None;
    }

    Some((
        TranscriptSegment::new(left_text, segment.start, left_end).with_tokens(left_tokens.to_vec()),
        TranscriptSegment::new(right_text, right_start, segment.end)
            .with_tokens(right_tokens.to_vec()),
    ))
}

/// Split at the time midpoint, cutting text at the whitespace nearest its middle.
fn bisect_at_midpoint(segment: &TranscriptSegment) -> Option<(TranscriptSegment, TranscriptSegment)> {
    let (left_text, right_text) = split_text(&segment.text)?;
    let mid = midpoint(segment);

    Some((
        TranscriptSegment::new(left_text, segment.start, mid),
        TranscriptSegment::new(right_text, mid, segment.end),
    ))
}

/// Join token texts, inserting spaces only for spaced scripts whose tokens lack them.
fn join_tokens(tokens: &[TranscriptToken], spaced: bool) -> String {
    let has_leading_space = tokens
        .iter()
        .any(|t| t.text.starts_with(char::is_whitespace));

    let text = if spaced && !has_leading_space {
        tokens
            .iter()
            .map(|t| t.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        tokens.iter().map(|t| t.text.as_str()).collect()
    };

    text.trim().to_string()
}

/// Split text near its middle character.
///
/// Cuts at the nearest whitespace. Text without whitespace is only cut at
/// its middle character when written in an unspaced script, so words of
/// spaced scripts stay whole. Returns `None` when either half would be empty.
fn split_text(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let n = text.chars().count();
    if n < 2 {
        return None;
    }

    let target = n / 2;

    let whitespace = text
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| c.is_whitespace())
        .min_by_key(|(pos, _)| pos.abs_diff(target))
        .map(|(_, (byte, c))| (byte, byte + c.len_utf8()));

    let (left_end, right_start) = match whitespace {
        Some(cut) => cut,
        None if is_unspaced_script(text) => {
            let byte = text
                .char_indices()
                .nth(target)
                .map_or(text.len(), |(byte, _)| byte);
            (byte, byte)
        }
        None => return None,
    };

    let left = text[..left_end].trim();
    let right = text[right_start..].trim();

    (!left.is_empty() && !right.is_empty()).then(|| (left.to_string(), right.to_string()))
}

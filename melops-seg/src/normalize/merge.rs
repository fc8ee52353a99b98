//! Merge adjacent transcript segments separated by short gaps.

use super::{gap, join_text};
use crate::policy::OptimizationPolicy;
use crate::types::TranscriptSegment;

/// Upper bound on merge passes for pathological input
const MAX_PASSES: usize = 16;

/// Merge neighbors until no further merge applies.
///
/// Two segments merge when the gap between them is below
/// `merge_threshold` and the merged span stays within `max_duration`.
pub fn merge(segments: Vec<TranscriptSegment>, policy: &OptimizationPolicy) -> Vec<TranscriptSegment> {
    let mut segments = segments;

    for pass in 1..=MAX_PASSES {
        let before = segments.len();
        segments = merge_pass(segments, policy);

        if segments.len() == before {
            tracing::trace!(pass, "merge reached fixed point");
            return segments;
        }
    }

    tracing::debug!(passes = MAX_PASSES, "merge pass limit reached");
    segments
}

/// Single left-to-right merge pass.
fn merge_pass(
    segments: Vec<TranscriptSegment>,
    policy: &OptimizationPolicy,
) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .fold(Vec::new(), |mut merged: Vec<TranscriptSegment>, next| {
            match merged.last_mut() {
                Some(last) if can_merge(last, &next, policy) => merge_into(last, next),
                _ => merged.push(next),
            }
            merged
        })
}

/// Whether `right` may be merged onto `left`.
pub(crate) fn can_merge(
    left: &TranscriptSegment,
    right: &TranscriptSegment,
    policy: &OptimizationPolicy,
) -> bool {
    let span = left.end.max(right.end).saturating_sub(left.start);
    gap(left, right) < policy.merge_threshold && span <= policy.max_duration
}

/// Extend `left` to cover `right`.
pub(crate) fn merge_into(left: &mut TranscriptSegment, right: TranscriptSegment) {
    left.text = join_text(&left.text, &right.text);
    left.end = left.end.max(right.end);
    left.tokens.extend(right.tokens);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranscriptToken;
    use std::time::Duration;

    fn policy() -> OptimizationPolicy {
        OptimizationPolicy::display()
    }

    #[test]
    fn merges_close_neighbors() {
        let segments = vec![
            TranscriptSegment::from_secs("hello", 0.0, 2.0),
            TranscriptSegment::from_secs("world", 2.2, 4.0),
        ];

        let result = merge(segments, &policy());

        match &result[..] {
            [single] => {
                assert_eq!(single.text, "hello world");
                assert_eq!(single.start, Duration::ZERO);
                assert_eq!(single.end, Duration::from_secs(4));
            }
            _ => panic!("expected 1 segment, got {}", result.len()),
        }
    }

    #[test]
    fn keeps_segments_across_wide_gap() {
        let segments = vec![
            TranscriptSegment::from_secs("hello", 0.0, 2.0),
            TranscriptSegment::from_secs("world", 2.5, 4.0),
        ];

        let result = merge(segments, &policy());

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn respects_max_duration() {
        let segments = vec![
            TranscriptSegment::from_secs("one", 0.0, 3.0),
            TranscriptSegment::from_secs("two", 3.1, 6.0),
            TranscriptSegment::from_secs("three", 6.1, 9.0),
        ];

        let result = merge(segments, &policy());

        match &result[..] {
            [first, second] => {
                assert_eq!(first.text, "one two");
                assert_eq!(second.text, "three");
            }
            _ => panic!("expected 2 segments, got {}", result.len()),
        }
    }

    #[test]
    fn merges_chains_of_short_segments() {
        let segments = vec![
            TranscriptSegment::from_secs("a", 0.0, 0.5),
            TranscriptSegment::from_secs("b", 0.6, 1.0),
            TranscriptSegment::from_secs("c", 1.1, 1.5),
            TranscriptSegment::from_secs("d", 1.6, 2.0),
        ];

        let result = merge(segments, &policy());

        match &result[..] {
            [single] => assert_eq!(single.text, "a b c d"),
            _ => panic!("expected 1 segment, got {}", result.len()),
        }
    }

    #[test]
    fn merging_is_idempotent() {
        let segments = vec![
            TranscriptSegment::from_secs("one", 0.0, 3.0),
            TranscriptSegment::from_secs("two", 3.1, 6.0),
            TranscriptSegment::from_secs("three", 6.1, 9.0),
            TranscriptSegment::from_secs("four", 12.0, 13.0),
            TranscriptSegment::from_secs("five", 13.2, 14.0),
        ];

        let once = merge(segments, &policy());
        let twice = merge(once.clone(), &policy());

        assert_eq!(once, twice);
    }

    #[test]
    fn treats_overlap_as_zero_gap() {
        let segments = vec![
            TranscriptSegment::from_secs("left", 0.0, 2.0),
            TranscriptSegment::from_secs("right", 1.5, 3.0),
        ];

        let result = merge(segments, &policy());

        match &result[..] {
            [single] => {
                assert_eq!(single.text, "left right");
                assert_eq!(single.end, Duration::from_secs(3));
            }
            _ => panic!("expected 1 segment, got {}", result.len()),
        }
    }

    #[test]
    fn concatenates_tokens() {
        let t = |s: f64| Duration::from_secs_f64(s);
        let segments = vec![
            TranscriptSegment::from_secs("hi", 0.0, 1.0)
                .with_tokens(vec![TranscriptToken::new(" hi", t(0.0), t(1.0))]),
            TranscriptSegment::from_secs("there", 1.1, 2.0)
                .with_tokens(vec![TranscriptToken::new(" there", t(1.1), t(2.0))]),
        ];

        let result = merge(segments, &policy());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].tokens.len(), 2);
    }
}

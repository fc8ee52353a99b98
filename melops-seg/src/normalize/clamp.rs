//! Bring segments shorter than the minimum duration up to size.

use super::gap;
use super::merge::{can_merge, merge_into};
use crate::policy::OptimizationPolicy;
use crate::types::TranscriptSegment;

/// Neighbor a short segment is merged into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Neighbor {
    Previous,
    Next,
}

/// Merge or extend every segment shorter than `min_duration`.
///
/// With merging enabled, a short segment joins the closer neighbor the
/// merge rules allow. Otherwise its end moves toward
/// `start + optimal_duration`, stopping at the next segment's start.
pub fn clamp(segments: Vec<TranscriptSegment>, policy: &OptimizationPolicy) -> Vec<TranscriptSegment> {
    let mut segments = segments;
    let mut i = 0;

    while i < segments.len() {
        if segments[i].duration() >= policy.min_duration {
            i += 1;
            continue;
        }

        match policy.merge.then(|| pick_neighbor(&segments, i, policy)).flatten() {
            Some(Neighbor::Previous) => {
                let short = segments.remove(i);
                merge_into(&mut segments[i - 1], short);
                // the merged segment may still be short
                i -= 1;
            }
            Some(Neighbor::Next) => {
                let next = segments.remove(i + 1);
                merge_into(&mut segments[i], next);
            }
            None => {
                extend(&mut segments, i, policy);
                i += 1;
            }
        }
    }

    segments
}

fn pick_neighbor(
    segments: &[TranscriptSegment],
    i: usize,
    policy: &OptimizationPolicy,
) -> Option<Neighbor> {
    let current = &segments[i];

    let previous = i
        .checked_sub(1)
        .map(|p| &segments[p])
        .filter(|prev| can_merge(prev, current, policy))
        .map(|prev| (Neighbor::Previous, gap(prev, current)));

    let next = segments
        .get(i + 1)
        .filter(|next| can_merge(current, next, policy))
        .map(|next| (Neighbor::Next, gap(current, next)));

    match (previous, next) {
        (Some(p), Some(n)) => Some(if p.1 <= n.1 { p.0 } else { n.0 }),
        (p, n) => p.or(n).map(|(neighbor, _)| neighbor),
    }
}

fn extend(segments: &mut [TranscriptSegment], i: usize, policy: &OptimizationPolicy) {
    let target = segments[i].start + policy.optimal_duration;
    let limit = segments.get(i + 1).map_or(target, |next| target.min(next.start));

    let segment = &mut segments[i];
    if limit > segment.end {
        segment.end = limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn display() -> OptimizationPolicy {
        OptimizationPolicy::display()
    }

    fn no_merge() -> OptimizationPolicy {
        OptimizationPolicy {
            merge: false,
            ..display()
        }
    }

    #[test]
    fn keeps_long_enough_segments() {
        let segments = vec![
            TranscriptSegment::from_secs("one", 0.0, 1.5),
            TranscriptSegment::from_secs("two", 3.0, 5.0),
        ];

        let result = clamp(segments.clone(), &display());

        assert_eq!(result, segments);
    }

    #[test]
    fn merges_into_closer_neighbor() {
        let segments = vec![
            TranscriptSegment::from_secs("before", 0.0, 2.0),
            TranscriptSegment::from_secs("short", 2.4, 2.8),
            TranscriptSegment::from_secs("after", 2.9, 5.0),
        ];

        let result = clamp(segments, &display());

        match &result[..] {
            [first, second] => {
                assert_eq!(first.text, "before");
                assert_eq!(second.text, "short after");
                assert_eq!(second.start, secs(2.4));
            }
            _ => panic!("expected 2 segments, got {result:?}"),
        }
    }

    #[test]
    fn merges_into_previous_on_equal_gap() {
        let segments = vec![
            TranscriptSegment::from_secs("before", 0.0, 2.0),
            TranscriptSegment::from_secs("short", 2.25, 2.75),
            TranscriptSegment::from_secs("after", 3.0, 5.0),
        ];

        let result = clamp(segments, &display());

        assert_eq!(result[0].text, "before short");
        assert_eq!(result[1].text, "after");
    }

    #[test]
    fn extends_isolated_short_segment_to_next_start() {
        let segments = vec![
            TranscriptSegment::from_secs("short", 0.0, 0.4),
            TranscriptSegment::from_secs("later", 2.0, 4.0),
        ];

        let result = clamp(segments, &display());

        match &result[..] {
            [first, second] => {
                assert_eq!(first.end, secs(2.0));
                assert_eq!(second.start, secs(2.0));
            }
            _ => panic!("expected 2 segments, got {result:?}"),
        }
    }

    #[test]
    fn extends_toward_optimal_duration() {
        let segments = vec![TranscriptSegment::from_secs("alone", 10.0, 10.5)];

        let result = clamp(segments, &no_merge());

        assert_eq!(result[0].end, secs(13.0));
    }

    #[test]
    fn keeps_short_segment_when_next_overlaps() {
        let segments = vec![
            TranscriptSegment::from_secs("short", 1.0, 1.5),
            TranscriptSegment::from_secs("overlap", 1.2, 4.0),
        ];

        let result = clamp(segments, &no_merge());

        assert_eq!(result[0].end, secs(1.5));
    }
}

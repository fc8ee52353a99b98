//! Drop non-speech annotations and fragments too short to display.

use crate::policy::OptimizationPolicy;
use crate::types::TranscriptSegment;

/// Keep segments passing [`keep`]. Neighbors are never merged across the gap.
pub fn filter(segments: Vec<TranscriptSegment>, policy: &OptimizationPolicy) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .filter(|segment| keep(segment, policy))
        .collect()
}

/// Whether a segment carries displayable speech.
pub fn keep(segment: &TranscriptSegment, policy: &OptimizationPolicy) -> bool {
    let text = segment.text.trim();
    text.chars().count() >= policy.min_text_length && !policy.is_excluded(text)
}

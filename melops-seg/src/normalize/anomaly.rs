//! Recognizer anomaly detection: implausible pacing, low confidence, hallucinated repetition.

use super::is_unspaced_script;
use crate::error::{AnomalyKind, Warning};
use crate::policy::OptimizationPolicy;
use crate::types::TranscriptSegment;
use std::time::Duration;

/// Remove anomalous segments, recording a warning for each.
pub fn drop_anomalies(
    segments: Vec<TranscriptSegment>,
    policy: &OptimizationPolicy,
    warnings: &mut Vec<Warning>,
) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .filter(|segment| match detect(segment, policy) {
            Some(kind) => {
                let warning = Warning::Anomaly {
                    kind,
                    start: segment.start,
                    text: segment.text.clone(),
                };
                tracing::warn!(%warning);
                warnings.push(warning);
                false
            }
            None => true,
        })
        .collect()
}

/// First anomaly found in a segment, if any.
pub fn detect(segment: &TranscriptSegment, policy: &OptimizationPolicy) -> Option<AnomalyKind> {
    if average_token_duration(segment).is_some_and(|d| d > policy.max_token_duration) {
        return Some(AnomalyKind::SlowTokens);
    }

    if segment
        .confidence()
        .is_some_and(|c| c < policy.min_confidence)
    {
        return Some(AnomalyKind::LowConfidence);
    }

    if repetition_count(&text_units(&segment.text)) > policy.max_repetition_count {
        return Some(AnomalyKind::Repetition);
    }

    None
}

/// Segment duration divided by its token count (words when no tokens).
fn average_token_duration(segment: &TranscriptSegment) -> Option<Duration> {
    let count = match segment.tokens.len() {
        0 => text_units(&segment.text).len(),
        n => n,
    };

    let count = u32::try_from(count).ok().filter(|&n| n > 0)?;
    Some(segment.duration() / count)
}

/// Normalized comparison units: lowercase words, or characters for unspaced scripts.
fn text_units(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect();

    match &words[..] {
        [single] if is_unspaced_script(single) => single.chars().map(String::from).collect(),
        _ => words,
    }
}

/// How many times the shortest repeating phrase covers the units.
///
/// A trailing partial repetition is tolerated: `a b a b a` counts as two.
fn repetition_count(units: &[String]) -> usize {
    let n = units.len();

    (1..=n / 2)
        .find(|&p| (p..n).all(|i| units[i] == units[i % p]))
        .map_or(1, |p| n / p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranscriptToken;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn units(text: &str) -> Vec<String> {
        text_units(text)
    }

    #[test]
    fn accepts_normal_speech() {
        let segment = TranscriptSegment::from_secs("This is a normal sentence.", 0.0, 2.0);
        assert_eq!(detect(&segment, &OptimizationPolicy::display()), None);
    }

    #[test]
    fn flags_slow_tokens() {
        let segment = TranscriptSegment::from_secs("hello there", 0.0, 6.0);

        assert_eq!(
            detect(&segment, &OptimizationPolicy::display()),
            Some(AnomalyKind::SlowTokens)
        );
    }

    #[test]
    fn counts_tokens_when_present() {
        let t = |text: &str, start: f64, end: f64| TranscriptToken::new(text, secs(start), secs(end));
        let segment = TranscriptSegment::from_secs("hello there", 0.0, 6.0).with_tokens(vec![
            t(" hel", 0.0, 1.0),
            t("lo", 1.0, 2.0),
            t(" the", 2.0, 4.0),
            t("re", 4.0, 6.0),
        ]);

        assert_eq!(detect(&segment, &OptimizationPolicy::display()), None);
    }

    #[test]
    fn flags_low_confidence() {
        let t = |p: f32| TranscriptToken::new("x", secs(0.0), secs(0.5)).with_confidence(p);
        let segment = TranscriptSegment::from_secs("quiet words", 0.0, 1.0)
            .with_tokens(vec![t(0.1), t(0.2)]);

        assert_eq!(
            detect(&segment, &OptimizationPolicy::display()),
            Some(AnomalyKind::LowConfidence)
        );
    }

    #[test]
    fn flags_hallucinated_repetition() {
        let segment =
            TranscriptSegment::from_secs("Thank you. Thank you. Thank you. Thank you.", 0.0, 4.0);

        assert_eq!(
            detect(&segment, &OptimizationPolicy::display()),
            Some(AnomalyKind::Repetition)
        );
    }

    #[test]
    fn tolerates_repetition_at_limit() {
        let segment = TranscriptSegment::from_secs("no no no", 0.0, 1.5);
        assert_eq!(detect(&segment, &OptimizationPolicy::display()), None);
    }

    #[test]
    fn counts_repeating_phrases() {
        assert_eq!(repetition_count(&units("thank you thank you thank you")), 3);
        assert_eq!(repetition_count(&units("la la la la la")), 5);
        assert_eq!(repetition_count(&units("go go go g")), 1);
        assert_eq!(repetition_count(&units("哈哈哈哈哈")), 5);
        assert_eq!(repetition_count(&units("one two three")), 1);
        assert_eq!(repetition_count(&[]), 1);
    }

    #[test]
    fn keeps_single_spaced_word_whole() {
        assert_eq!(units("Mmmm..."), ["mmmm"]);

        let segment = TranscriptSegment::from_secs("Mmmm", 0.0, 1.0);
        assert_eq!(detect(&segment, &OptimizationPolicy::display()), None);
    }

    #[test]
    fn tolerates_trailing_partial_repetition() {
        let units: Vec<String> = ["a", "b", "a", "b", "a"].map(String::from).to_vec();
        assert_eq!(repetition_count(&units), 2);
    }

    #[test]
    fn drops_and_reports_anomalies() {
        let segments = vec![
            TranscriptSegment::from_secs("fine", 0.0, 1.0),
            TranscriptSegment::from_secs("you you you you you", 1.0, 3.0),
        ];
        let mut warnings = Vec::new();

        let result = drop_anomalies(segments, &OptimizationPolicy::display(), &mut warnings);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "fine");
        assert!(matches!(
            &warnings[..],
            [Warning::Anomaly {
                kind: AnomalyKind::Repetition,
                ..
            }]
        ));
    }
}

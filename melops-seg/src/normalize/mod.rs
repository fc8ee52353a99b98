//! Transcript normalization: recognizer segments to a subtitle document.
//!
//! Stages run in order, each toggled by the [`OptimizationPolicy`]:
//!
//! | Stage   | Module      | Toggle             |
//! |---------|-------------|--------------------|
//! | filter  | [`filter`]  | always             |
//! | merge   | [`merge`]   | `merge`            |
//! | split   | [`split`]   | `split`            |
//! | anomaly | [`anomaly`] | `detect_anomalies` |
//! | clamp   | [`clamp`]   | always             |

pub mod anomaly;
pub mod clamp;
pub mod filter;
pub mod merge;
pub mod split;

use crate::document::SubtitleDocument;
use crate::error::{ConfigError, Warning};
use crate::policy::OptimizationPolicy;
use crate::types::{SubtitleSegment, TranscriptSegment};
use std::borrow::Cow;
use std::time::Duration;

/// Subtitle generation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// One subtitle per normalized recognizer segment
    #[default]
    Segment,
    /// One subtitle per token, bypassing merge, split and clamp
    WordLevel,
    /// Full pipeline with every stage enabled
    TtsOptimized,
}

/// Subtitle document plus the warnings raised while building it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Synthesis {
    pub document: SubtitleDocument,
    pub warnings: Vec<Warning>,
}

/// Transcript normalizer bound to a validated policy.
#[derive(Clone, Debug, PartialEq)]
pub struct Synthesizer {
    policy: OptimizationPolicy,
}

impl Synthesizer {
    pub fn new(policy: OptimizationPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &OptimizationPolicy {
        &self.policy
    }

    /// Run the normalization pipeline and build a subtitle document.
    pub fn synthesize(
        &self,
        segments: impl IntoIterator<Item = TranscriptSegment>,
        mode: Mode,
    ) -> Synthesis {
        let mut warnings = Vec::new();
        let segments = ingest(segments, &mut warnings);

        let segments = match mode {
            Mode::Segment => normalize(segments, &self.policy, &mut warnings),
            Mode::TtsOptimized => {
                let policy = Cow::Borrowed(&self.policy);
                let policy = if policy.merge && policy.split && policy.detect_anomalies {
                    policy
                } else {
                    Cow::Owned(self.policy.clone().with_all_stages())
                };
                normalize(segments, &policy, &mut warnings)
            }
            Mode::WordLevel => word_level(segments, &self.policy, &mut warnings),
        };

        let document = SubtitleDocument::from_segments(
            segments
                .into_iter()
                .map(|s| SubtitleSegment::new(s.text, s.start, s.end)),
        );

        tracing::debug!(
            ?mode,
            subtitles = document.len(),
            warnings = warnings.len(),
            "synthesized subtitles"
        );

        Synthesis { document, warnings }
    }
}

/// Trim text, order by start, and drop degenerate segments.
fn ingest(
    segments: impl IntoIterator<Item = TranscriptSegment>,
    warnings: &mut Vec<Warning>,
) -> Vec<TranscriptSegment> {
    let mut segments: Vec<_> = segments
        .into_iter()
        .filter_map(|mut segment| {
            if segment.is_degenerate() {
                let warning = Warning::DegenerateSegment {
                    start: segment.start,
                    end: segment.end,
                };
                tracing::warn!(%warning);
                warnings.push(warning);
                return None;
            }
            segment.text = tidy_text(&segment.text);
            Some(segment)
        })
        .collect();

    segments.sort_by_key(|s| s.start);
    segments
}

fn normalize(
    segments: Vec<TranscriptSegment>,
    policy: &OptimizationPolicy,
    warnings: &mut Vec<Warning>,
) -> Vec<TranscriptSegment> {
    let total = segments.len();

    let segments = filter::filter(segments, policy);
    tracing::debug!(before = total, after = segments.len(), "filter");

    let segments = if policy.merge {
        let before = segments.len();
        let merged = merge::merge(segments, policy);
        tracing::debug!(before, after = merged.len(), "merge");
        merged
    } else {
        segments
    };

    let segments = if policy.split {
        let before = segments.len();
        let split = split::split(segments, policy);
        tracing::debug!(before, after = split.len(), "split");
        split
    } else {
        segments
    };

    let segments = if policy.detect_anomalies {
        let before = segments.len();
        let kept = anomaly::drop_anomalies(segments, policy, warnings);
        tracing::debug!(before, after = kept.len(), "anomaly");
        kept
    } else {
        segments
    };

    clamp::clamp(segments, policy)
}

/// Explode segments into one segment per token.
///
/// Segments without tokens pass through whole.
fn word_level(
    segments: Vec<TranscriptSegment>,
    policy: &OptimizationPolicy,
    warnings: &mut Vec<Warning>,
) -> Vec<TranscriptSegment> {
    let words: Vec<_> = segments
        .into_iter()
        .flat_map(|segment| {
            if segment.tokens.is_empty() {
                return vec![segment];
            }
            segment
                .tokens
                .into_iter()
                .map(|token| {
                    TranscriptSegment::new(token.text.trim(), token.start, token.end)
                        .with_tokens(vec![token])
                })
                .collect()
        })
        .collect();

    let words = ingest(words, warnings);
    let words = filter::filter(words, policy);

    if policy.detect_anomalies {
        anomaly::drop_anomalies(words, policy, warnings)
    } else {
        words
    }
}

/// Trim every line and drop blank ones.
fn tidy_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Silence between two segments (zero when they overlap).
pub(crate) fn gap(left: &TranscriptSegment, right: &TranscriptSegment) -> Duration {
    right.start.saturating_sub(left.end)
}

/// Whether text contains a script written without spaces between words.
pub(crate) fn is_unspaced_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c as u32,
            0x0E00..=0x0EFF // Thai, Lao
                | 0x1000..=0x109F // Myanmar
                | 0x1780..=0x17FF // Khmer
                | 0x3040..=0x30FF // Hiragana, Katakana
                | 0x31F0..=0x31FF
                | 0x3400..=0x4DBF // CJK
                | 0x4E00..=0x9FFF
                | 0xF900..=0xFAFF
                | 0xFF66..=0xFF9F
                | 0x20000..=0x2FA1F
        )
    })
}

/// Join two texts with a single space.
pub(crate) fn join_text(left: &str, right: &str) -> String {
    match (left.trim(), right.trim()) {
        ("", r) => r.to_string(),
        (l, "") => l.to_string(),
        (l, r) => format!("{l} {r}"),
    }
}

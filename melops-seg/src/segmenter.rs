//! Silence-aware partitioning of a VAD timeline into bounded audio segments.

use crate::error::{ConfigError, Warning};
use crate::types::{AudioSegment, SpeechInterval};
use std::time::Duration;

/// Default maximum segment duration (5 minutes)
const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(300);

/// Default minimum silence to count as a natural cut point
const DEFAULT_MIN_SILENCE: Duration = Duration::from_millis(500);

/// Default factor over the maximum duration tolerated while looking for silence
const DEFAULT_FORCED_SPLIT_MULTIPLIER: f64 = 1.5;

/// Audio segmentation configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioSegmenter {
    /// Segments longer than this are split (default: 300s)
    pub max_duration: Duration,

    /// Shortest silence accepted as a natural split point (default: 0.5s)
    pub min_silence_for_split: Duration,

    /// How far past `max_duration` to search for silence before forcing a split (default: 1.5)
    pub forced_split_multiplier: f64,
}

/// Audio segments plus the warnings raised while building them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segmentation {
    pub segments: Vec<AudioSegment>,
    pub warnings: Vec<Warning>,
}

/// Where to close the open segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cut {
    /// Before interval `i`, after an absorbed run holding a qualifying silence
    AfterSilence(usize, Duration),
    /// At the start of interval `i`, which is not absorbed
    Before(usize),
    /// At the start of silence interval `i`
    AtSilence(usize),
}

impl Default for AudioSegmenter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AudioSegmenter {
    pub const DEFAULT: Self = Self {
        max_duration: DEFAULT_MAX_DURATION,
        min_silence_for_split: DEFAULT_MIN_SILENCE,
        forced_split_multiplier: DEFAULT_FORCED_SPLIT_MULTIPLIER,
    };

    /// Create a validated segmenter.
    pub fn new(
        max_duration: Duration,
        min_silence_for_split: Duration,
        forced_split_multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if max_duration.is_zero() {
            return Err(ConfigError::InvalidMaxDuration(max_duration));
        }
        if !(forced_split_multiplier >= 1.0 && forced_split_multiplier.is_finite()) {
            return Err(ConfigError::InvalidSplitMultiplier(forced_split_multiplier));
        }

        Ok(Self {
            max_duration,
            min_silence_for_split,
            forced_split_multiplier,
        })
    }

    /// Longest span searched for a silence before a split is forced.
    pub fn forced_split_limit(&self) -> Duration {
        self.max_duration.mul_f64(self.forced_split_multiplier)
    }

    /// Partition ordered VAD intervals into audio segments.
    ///
    /// Scans left to right with one open segment that absorbs speech and
    /// silence alike. When the next interval would push it past
    /// `max_duration`, the segment is closed at the nearest natural pause,
    /// or at the interval boundary when no pause is close enough. Speech is
    /// never cut mid-interval and never dropped, so a single interval longer
    /// than `max_duration` becomes one oversized segment.
    pub fn segment(&self, intervals: &[SpeechInterval]) -> Segmentation {
        let (intervals, warnings) = drop_degenerate(intervals);

        let mut segments = Vec::new();
        let mut current: Option<AudioSegment> = None;
        let mut i = 0;

        while let Some(interval) = intervals.get(i) {
            let Some(segment) = current.as_mut() else {
                // skip silence until speech opens a segment
                if interval.is_speech {
                    current = Some(AudioSegment::open(interval));
                }
                i += 1;
                continue;
            };

            if interval.end.saturating_sub(segment.start) <= self.max_duration {
                segment.end = interval.end;
                i += 1;
                continue;
            }

            match self.find_cut(&intervals, i, segment.start) {
                Cut::AfterSilence(j, silence) => {
                    segment.end = intervals[j].start;
                    segment.split_silence_duration = silence;
                    i = j;
                }
                Cut::Before(j) => {
                    segment.end = intervals[j].start;
                    segment.split_silence_duration = boundary_silence(&intervals, j);
                    // interval j is revisited with no open segment
                    i = j;
                }
                Cut::AtSilence(j) => {
                    segment.end = intervals[j].start;
                    segment.split_silence_duration = intervals[j].duration();
                    i = j + 1;
                }
            }

            tracing::trace!(?segment, "closed audio segment");
            segments.extend(current.take());
        }

        segments.extend(current);

        tracing::debug!(
            intervals = intervals.len(),
            segments = segments.len(),
            "segmented vad timeline"
        );

        Segmentation { segments, warnings }
    }

    /// Partition intervals, discarding warnings.
    pub fn segment_intervals(&self, intervals: &[SpeechInterval]) -> Vec<AudioSegment> {
        self.segment(intervals).segments
    }

    /// Choose a cut for a segment starting at `start` that cannot absorb interval `i`.
    ///
    /// Earliest qualifying silence wins: one in the run just absorbed, then the
    /// first one ahead within the forced split limit.
    fn find_cut(&self, intervals: &[SpeechInterval], i: usize, start: Duration) -> Cut {
        let qualifies =
            |iv: &SpeechInterval| iv.is_silence() && iv.duration() >= self.min_silence_for_split;

        if let Some(silence) = absorbed_silence(intervals, i).filter(|iv| qualifies(iv)) {
            return Cut::AfterSilence(i, silence.duration());
        }

        let limit = self.forced_split_limit();

        intervals[i..]
            .iter()
            .take_while(|iv| iv.start.saturating_sub(start) <= limit)
            .position(qualifies)
            .map_or(Cut::Before(i), |k| Cut::AtSilence(i + k))
    }
}

/// Longest silence in the run of silences ending just before interval `i`.
fn absorbed_silence(intervals: &[SpeechInterval], i: usize) -> Option<&SpeechInterval> {
    intervals[..i]
        .iter()
        .rev()
        .take_while(|iv| iv.is_silence())
        .max_by_key(|iv| iv.duration())
}

/// Silence at the boundary before interval `i`: the interval itself or the run just absorbed.
fn boundary_silence(intervals: &[SpeechInterval], i: usize) -> Duration {
    Some(&intervals[i])
        .filter(|iv| iv.is_silence())
        .or_else(|| absorbed_silence(intervals, i))
        .map_or(Duration::ZERO, SpeechInterval::duration)
}

fn drop_degenerate(intervals: &[SpeechInterval]) -> (Vec<SpeechInterval>, Vec<Warning>) {
    let mut warnings = Vec::new();

    let kept = intervals
        .iter()
        .filter(|iv| {
            let degenerate = iv.end <= iv.start;
            if degenerate {
                let warning = Warning::DegenerateSegment {
                    start: iv.start,
                    end: iv.end,
                };
                tracing::warn!(%warning);
                warnings.push(warning);
            }
            !degenerate
        })
        .copied()
        .collect();

    (kept, warnings)
}

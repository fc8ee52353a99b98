//! Core types for melops-seg

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Voice activity interval.
///
/// Half-open `[start, end)` range classified as speech or silence by an
/// external VAD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeechInterval {
    pub start: Duration,
    pub end: Duration,
    pub is_speech: bool,
}

impl SpeechInterval {
    pub fn new(start: Duration, end: Duration, is_speech: bool) -> Self {
        Self {
            start,
            end,
            is_speech,
        }
    }

    /// Speech interval from seconds.
    pub fn speech(start: f64, end: f64) -> Self {
        Self::new(
            Duration::from_secs_f64(start),
            Duration::from_secs_f64(end),
            true,
        )
    }

    /// Silence interval from seconds.
    pub fn silence(start: f64, end: f64) -> Self {
        Self::new(
            Duration::from_secs_f64(start),
            Duration::from_secs_f64(end),
            false,
        )
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    pub fn is_silence(&self) -> bool {
        !self.is_speech
    }
}

/// Bounded range of the source audio chosen for downstream recognition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    #[serde(serialize_with = "secs")]
    pub start: Duration,
    #[serde(serialize_with = "secs")]
    pub end: Duration,
    /// Length of the silence the segment was cut on (zero for a forced split)
    #[serde(serialize_with = "secs")]
    pub split_silence_duration: Duration,
}

impl AudioSegment {
    /// Open a segment covering a single interval.
    pub(crate) fn open(interval: &SpeechInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            split_silence_duration: Duration::ZERO,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

fn secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// Timed line of subtitle text.
///
/// `index` is owned by the containing [`SubtitleDocument`](crate::document::SubtitleDocument)
/// and rewritten on every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtitleSegment {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

impl SubtitleSegment {
    /// Create an unindexed segment. The document assigns the index.
    pub fn new(text: impl Into<String>, start: Duration, end: Duration) -> Self {
        Self {
            index: 0,
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Recognized token with timing and confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptToken {
    pub text: String,
    pub start: Duration,
    pub end: Duration,
    /// Recognizer probability in `[0, 1]`, when reported
    pub confidence: Option<f32>,
}

impl TranscriptToken {
    pub fn new(text: impl Into<String>, start: Duration, end: Duration) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Recognizer output segment with optional token-level detail.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: Duration,
    pub end: Duration,
    pub tokens: Vec<TranscriptToken>,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: Duration, end: Duration) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            tokens: Vec::new(),
        }
    }

    /// Segment from seconds, without tokens.
    pub fn from_secs(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self::new(
            text,
            Duration::from_secs_f64(start),
            Duration::from_secs_f64(end),
        )
    }

    pub fn with_tokens(mut self, tokens: Vec<TranscriptToken>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    /// Mean token confidence, `None` if no token reports one.
    pub fn confidence(&self) -> Option<f32> {
        let (sum, count) = self
            .tokens
            .iter()
            .filter_map(|t| t.confidence)
            .fold((0.0, 0usize), |(sum, n), c| (sum + c, n + 1));

        (count > 0).then(|| sum / count as f32)
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }
}

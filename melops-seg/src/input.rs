//! VAD and transcript JSON documents.
//!
//! Both loaders accept either a wrapper object or a bare array:
//!
//! ```json
//! {"segments": [{"start": 0.0, "end": 5.0, "isSpeech": true}], "speechCount": 1}
//! ```
//!
//! ```json
//! {"transcription": [{"timestampFrom": "00:00:00,000", "timestampTo": 2.5,
//!   "text": " hello", "tokens": [{"text": " hello", "timestampFrom": 0.0,
//!   "timestampTo": 2.5, "probability": 0.93}]}]}
//! ```

use crate::error::{Error, ParseError, Result};
use crate::timecode::parse_timestamp;
use crate::types::{SpeechInterval, TranscriptSegment, TranscriptToken};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Time value in decimal seconds or `HH:MM:SS,mmm`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Seconds(f64),
    Timestamp(String),
}

impl TryFrom<TimeValue> for Duration {
    type Error = ParseError;

    fn try_from(value: TimeValue) -> std::result::Result<Self, ParseError> {
        match value {
            TimeValue::Seconds(secs) => {
                Duration::try_from_secs_f64(secs).map_err(|_| ParseError::NegativeTime(secs))
            }
            TimeValue::Timestamp(s) => parse_timestamp(&s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterval {
    start: f64,
    end: f64,
    is_speech: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVad {
    Document {
        segments: Vec<RawInterval>,
        #[serde(default, rename = "speechCount")]
        speech_count: Option<usize>,
        #[serde(default, rename = "silenceCount")]
        silence_count: Option<usize>,
        #[serde(default, rename = "totalSpeechDuration")]
        total_speech_duration: Option<f64>,
    },
    Intervals(Vec<RawInterval>),
}

/// Parsed VAD result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VadResult {
    /// Intervals sorted by start
    pub intervals: Vec<SpeechInterval>,
    /// Aggregate counters reported by the VAD, for display only
    pub speech_count: Option<usize>,
    pub silence_count: Option<usize>,
    pub total_speech_duration: Option<Duration>,
}

impl VadResult {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_to_string(path.as_ref())?.parse()
    }

    /// Total speech time, computed from intervals when the VAD did not report it.
    pub fn speech_duration(&self) -> Duration {
        self.total_speech_duration.unwrap_or_else(|| {
            self.intervals
                .iter()
                .filter(|iv| iv.is_speech)
                .map(SpeechInterval::duration)
                .sum()
        })
    }
}

impl std::str::FromStr for VadResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (raw, speech_count, silence_count, total) = match serde_json::from_str(s)? {
            RawVad::Document {
                segments,
                speech_count,
                silence_count,
                total_speech_duration,
            } => (segments, speech_count, silence_count, total_speech_duration),
            RawVad::Intervals(segments) => (segments, None, None, None),
        };

        let mut intervals = raw
            .into_iter()
            .map(|iv| -> std::result::Result<_, ParseError> {
                Ok(SpeechInterval::new(
                    TimeValue::Seconds(iv.start).try_into()?,
                    TimeValue::Seconds(iv.end).try_into()?,
                    iv.is_speech,
                ))
            })
            .collect::<std::result::Result<Vec<_>, ParseError>>()?;

        intervals.sort_by_key(|iv| iv.start);

        let total_speech_duration = total
            .map(|secs| Duration::try_from(TimeValue::Seconds(secs)))
            .transpose()?;

        tracing::debug!(intervals = intervals.len(), "parsed vad result");

        Ok(Self {
            intervals,
            speech_count,
            silence_count,
            total_speech_duration,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    text: String,
    timestamp_from: TimeValue,
    timestamp_to: TimeValue,
    #[serde(default)]
    probability: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    timestamp_from: TimeValue,
    timestamp_to: TimeValue,
    text: String,
    #[serde(default)]
    tokens: Vec<RawToken>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Document {
        #[serde(alias = "segments")]
        transcription: Vec<RawSegment>,
    },
    Segments(Vec<RawSegment>),
}

/// Parsed recognizer transcript.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_to_string(path.as_ref())?.parse()
    }

    pub fn into_segments(self) -> Vec<TranscriptSegment> {
        self.segments
    }
}

impl std::str::FromStr for Transcript {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = match serde_json::from_str(s)? {
            RawTranscript::Document { transcription } => transcription,
            RawTranscript::Segments(segments) => segments,
        };

        let segments = raw
            .into_iter()
            .map(convert_segment)
            .collect::<std::result::Result<Vec<_>, ParseError>>()?;

        tracing::debug!(segments = segments.len(), "parsed transcript");

        Ok(Self { segments })
    }
}

fn convert_segment(raw: RawSegment) -> std::result::Result<TranscriptSegment, ParseError> {
    let tokens = raw
        .tokens
        .into_iter()
        .filter(|t| !is_control_token(&t.text))
        .map(|t| -> std::result::Result<_, ParseError> {
            Ok(TranscriptToken {
                text: t.text,
                start: t.timestamp_from.try_into()?,
                end: t.timestamp_to.try_into()?,
                confidence: t.probability.map(|p| p.clamp(0.0, 1.0)),
            })
        })
        .collect::<std::result::Result<Vec<_>, ParseError>>()?;

    Ok(TranscriptSegment::new(
        raw.text,
        raw.timestamp_from.try_into()?,
        raw.timestamp_to.try_into()?,
    )
    .with_tokens(tokens))
}

/// Recognizer control markers such as `[_BEG_]` or `[_TT_150]`.
fn is_control_token(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("[_") && text.ends_with(']')
}

fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

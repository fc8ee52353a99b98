//! Error and warning types for melops-seg organized by processing stage.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Segmentation error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file does not exist
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input parsing stage error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configuration stage error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error during reading or writing
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Malformed input documents (JSON, subtitle text, time values).
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON document does not match the expected schema
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// Time value could not be parsed
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// Time value in seconds is negative or not finite
    #[error("invalid time value: {0}s (expected a finite, non-negative number)")]
    NegativeTime(f64),

    /// Subtitle block without a valid time-range line
    #[error("line {line}: missing time range in subtitle block")]
    MissingTimeRange { line: usize },

    /// Subtitle block with an unparsable index line
    #[error("line {line}: invalid subtitle index {value:?}")]
    InvalidIndex { line: usize, value: String },

    /// Time range whose end precedes its start
    #[error("line {line}: time range ends before it starts")]
    InvertedRange { line: usize },
}

/// Configuration errors (policy thresholds, segmenter settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Maximum duration must be positive
    #[error("invalid max duration: {0:?} (must be positive)")]
    InvalidMaxDuration(Duration),

    /// Forced split multiplier below one would split before the limit
    #[error("invalid forced split multiplier: {0} (minimum 1.0)")]
    InvalidSplitMultiplier(f64),

    /// Split threshold must be positive
    #[error("invalid split threshold: {0:?} (must be positive)")]
    InvalidSplitThreshold(Duration),

    /// Minimum duration exceeds maximum duration
    #[error("min duration {min:?} exceeds max duration {max:?}")]
    InvalidDurationRange { min: Duration, max: Duration },

    /// Optimal duration outside the min/max range
    #[error("optimal duration {optimal:?} outside [{min:?}, {max:?}]")]
    InvalidOptimalDuration {
        optimal: Duration,
        min: Duration,
        max: Duration,
    },

    /// Confidence threshold outside [0, 1]
    #[error("invalid min confidence: {0} (expected 0.0..=1.0)")]
    InvalidConfidence(f32),

    /// Duration given in seconds is negative or not finite
    #[error("invalid duration for {name}: {value}s")]
    InvalidDuration { name: &'static str, value: f64 },
}

/// Result type alias for melops-seg operations.
pub type Result<T> = std::result::Result<T, Error>;

// serde_json::Error → ParseError → Error
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(ParseError::Json(e))
    }
}

/// Reason a transcript segment was flagged as a recognizer anomaly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Average time per token is implausibly long
    SlowTokens,
    /// Recognizer confidence below the policy threshold
    LowConfidence,
    /// Same word or phrase repeated past the policy limit
    Repetition,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnomalyKind::SlowTokens => "slow tokens",
            AnomalyKind::LowConfidence => "low confidence",
            AnomalyKind::Repetition => "repetition",
        };
        f.write_str(s)
    }
}

/// Recoverable problem found while processing otherwise valid input.
///
/// Warnings never abort a run. The offending segment is dropped or merged
/// and processing continues.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Warning {
    /// Zero or negative duration segment, dropped
    #[error("dropped degenerate segment at {start:?}..{end:?}")]
    DegenerateSegment { start: Duration, end: Duration },

    /// Likely recognizer error, dropped
    #[error("dropped anomalous segment at {start:?} ({kind}): {text:?}")]
    Anomaly {
        kind: AnomalyKind,
        start: Duration,
        text: String,
    },
}

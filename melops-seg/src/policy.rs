//! Subtitle optimization policy.

use crate::error::ConfigError;
use std::time::Duration;

/// Common non-speech annotations emitted by recognizers.
pub const DEFAULT_EXCLUSION_PATTERNS: &[&str] = &[
    "(music)",
    "[music]",
    "(applause)",
    "[applause]",
    "(laughter)",
    "[laughter]",
    "(silence)",
    "[silence]",
    "[blank_audio]",
    "(inaudible)",
    "[inaudible]",
    "♪",
];

/// Thresholds and stage toggles for transcript normalization.
///
/// Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationPolicy {
    /// Segments shorter than this are merged or extended
    pub min_duration: Duration,
    /// Merges never produce segments longer than this
    pub max_duration: Duration,
    /// Target length when extending short segments
    pub optimal_duration: Duration,
    /// Neighbors separated by less than this are merged
    pub merge_threshold: Duration,
    /// Segments longer than this are split
    pub split_threshold: Duration,
    /// Average time per token above this marks an anomaly
    pub max_token_duration: Duration,
    /// Mean token confidence below this marks an anomaly
    pub min_confidence: f32,
    /// A phrase repeated more times than this marks an anomaly
    pub max_repetition_count: usize,
    /// Trimmed text shorter than this (in chars) is dropped
    pub min_text_length: usize,
    /// Case-insensitive substrings that mark non-speech text
    pub exclusion_patterns: Vec<String>,
    pub merge: bool,
    pub split: bool,
    pub detect_anomalies: bool,
}

impl Default for OptimizationPolicy {
    fn default() -> Self {
        Self::display()
    }
}

impl OptimizationPolicy {
    /// Preset for on-screen subtitles.
    ///
    /// Targets ~3 second lines, never longer than 7 seconds, in line with
    /// typical reading comfort.
    pub fn display() -> Self {
        Self {
            min_duration: Duration::from_secs(1),
            max_duration: Duration::from_secs(7),
            optimal_duration: Duration::from_secs(3),
            merge_threshold: Duration::from_millis(500),
            split_threshold: Duration::from_secs(7),
            max_token_duration: Duration::from_secs(2),
            min_confidence: 0.3,
            max_repetition_count: 3,
            min_text_length: 2,
            exclusion_patterns: default_exclusion_patterns(),
            merge: true,
            split: true,
            detect_anomalies: true,
        }
    }

    /// Preset for downstream speech synthesis.
    ///
    /// Allows up to 15 second segments with a wider merge gap.
    pub fn tts() -> Self {
        Self {
            min_duration: Duration::from_millis(1500),
            max_duration: Duration::from_secs(15),
            optimal_duration: Duration::from_secs(6),
            merge_threshold: Duration::from_millis(800),
            split_threshold: Duration::from_secs(12),
            ..Self::display()
        }
    }

    /// Enable every stage.
    pub fn with_all_stages(self) -> Self {
        Self {
            merge: true,
            split: true,
            detect_anomalies: true,
            ..self
        }
    }

    /// Check threshold consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_duration.is_zero() {
            return Err(ConfigError::InvalidMaxDuration(self.max_duration));
        }
        if self.split_threshold.is_zero() {
            return Err(ConfigError::InvalidSplitThreshold(self.split_threshold));
        }
        if self.min_duration > self.max_duration {
            return Err(ConfigError::InvalidDurationRange {
                min: self.min_duration,
                max: self.max_duration,
            });
        }
        if !(self.min_duration..=self.max_duration).contains(&self.optimal_duration) {
            return Err(ConfigError::InvalidOptimalDuration {
                optimal: self.optimal_duration,
                min: self.min_duration,
                max: self.max_duration,
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        Ok(())
    }

    /// Whether trimmed text matches an exclusion pattern.
    pub fn is_excluded(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.exclusion_patterns
            .iter()
            .map(|p| p.trim().to_lowercase())
            .any(|p| !p.is_empty() && text.contains(&p))
    }
}

fn default_exclusion_patterns() -> Vec<String> {
    DEFAULT_EXCLUSION_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

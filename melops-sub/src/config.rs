//! Configuration types for resolved CLI arguments.
//!
//! This module contains Config structs and their TryFrom implementations.
//! Args structs (for CLI parsing) remain in cli.rs.

use crate::cli::{ModeArgs, PolicyArgs, SegmenterArgs};
use eyre::Result;
use melops_seg::error::ConfigError;
use melops_seg::normalize::Mode;
use melops_seg::policy::OptimizationPolicy;
use melops_seg::segmenter::AudioSegmenter;
use std::time::Duration;

/// Resolved subtitle synthesis configuration.
///
/// The policy starts from the mode's preset and applies every override.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisConfig {
    pub mode: Mode,
    pub policy: OptimizationPolicy,
}

impl TryFrom<(ModeArgs, PolicyArgs)> for SynthesisConfig {
    type Error = eyre::Error;

    fn try_from((mode, args): (ModeArgs, PolicyArgs)) -> Result<Self> {
        let mode = Mode::from(mode);

        let mut policy = match mode {
            Mode::TtsOptimized => OptimizationPolicy::tts(),
            Mode::Segment | Mode::WordLevel => OptimizationPolicy::display(),
        };

        override_duration(&mut policy.min_duration, "min-duration", args.min_duration)?;
        override_duration(&mut policy.max_duration, "max-duration", args.max_duration)?;
        override_duration(
            &mut policy.optimal_duration,
            "optimal-duration",
            args.optimal_duration,
        )?;
        override_duration(
            &mut policy.merge_threshold,
            "merge-threshold",
            args.merge_threshold,
        )?;
        override_duration(
            &mut policy.split_threshold,
            "split-threshold",
            args.split_threshold,
        )?;
        override_duration(
            &mut policy.max_token_duration,
            "max-token-duration",
            args.max_token_duration,
        )?;

        if let Some(confidence) = args.min_confidence {
            policy.min_confidence = confidence;
        }
        if let Some(count) = args.max_repetition_count {
            policy.max_repetition_count = count;
        }
        if let Some(length) = args.min_text_length {
            policy.min_text_length = length;
        }

        policy.exclusion_patterns.extend(args.exclusion_patterns);
        policy.merge &= !args.no_merge;
        policy.split &= !args.no_split;
        policy.detect_anomalies &= !args.no_anomaly;

        policy.validate()?;

        Ok(Self { mode, policy })
    }
}

/// Resolved audio segmentation configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmenterConfig {
    pub segmenter: AudioSegmenter,
}

impl TryFrom<SegmenterArgs> for SegmenterConfig {
    type Error = eyre::Error;

    fn try_from(args: SegmenterArgs) -> Result<Self> {
        let segmenter = AudioSegmenter::new(
            to_duration("max-duration", args.max_duration)?,
            to_duration("min-silence", args.min_silence)?,
            args.forced_split_multiplier,
        )?;

        Ok(Self { segmenter })
    }
}

fn override_duration(target: &mut Duration, name: &'static str, secs: Option<f64>) -> Result<()> {
    if let Some(secs) = secs {
        *target = to_duration(name, secs)?;
    }
    Ok(())
}

fn to_duration(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(mode: ModeArgs, policy: PolicyArgs) -> Result<SynthesisConfig> {
        SynthesisConfig::try_from((mode, policy))
    }

    #[test]
    fn segment_mode_uses_display_preset() {
        let config = resolve(ModeArgs::default(), PolicyArgs::default()).unwrap();

        assert_eq!(config.mode, Mode::Segment);
        assert_eq!(config.policy, OptimizationPolicy::display());
    }

    #[test]
    fn tts_mode_uses_tts_preset() {
        let mode = ModeArgs {
            tts_optimized: true,
            ..Default::default()
        };

        let config = resolve(mode, PolicyArgs::default()).unwrap();

        assert_eq!(config.mode, Mode::TtsOptimized);
        assert_eq!(config.policy.max_duration, Duration::from_secs(15));
    }

    #[test]
    fn applies_overrides() {
        let args = PolicyArgs {
            merge_threshold: Some(0.2),
            min_confidence: Some(0.5),
            exclusion_patterns: vec!["subscribe".into()],
            no_anomaly: true,
            ..Default::default()
        };

        let config = resolve(ModeArgs::default(), args).unwrap();
        let policy = &config.policy;

        assert_eq!(policy.merge_threshold, Duration::from_millis(200));
        assert_eq!(policy.min_confidence, 0.5);
        assert!(!policy.detect_anomalies);
        assert!(policy.merge);
        assert!(policy.exclusion_patterns.iter().any(|p| p == "subscribe"));
        assert!(policy.exclusion_patterns.iter().any(|p| p == "[music]"));
    }

    #[test]
    fn rejects_negative_duration() {
        let args = PolicyArgs {
            min_duration: Some(-1.0),
            ..Default::default()
        };

        let err = resolve(ModeArgs::default(), args).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidDuration { name: "min-duration", .. })
        ));
    }

    #[test]
    fn rejects_inverted_duration_range() {
        let args = PolicyArgs {
            min_duration: Some(10.0),
            max_duration: Some(5.0),
            ..Default::default()
        };

        let err = resolve(ModeArgs::default(), args).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidDurationRange { .. })
        ));
    }

    #[test]
    fn resolves_segmenter() {
        let args = SegmenterArgs {
            max_duration: 30.0,
            min_silence: 0.25,
            forced_split_multiplier: 2.0,
        };

        let config = SegmenterConfig::try_from(args).unwrap();

        assert_eq!(config.segmenter.max_duration, Duration::from_secs(30));
        assert_eq!(config.segmenter.min_silence_for_split, Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_max_segment_duration() {
        let args = SegmenterArgs {
            max_duration: 0.0,
            min_silence: 0.5,
            forced_split_multiplier: 1.5,
        };

        let err = SegmenterConfig::try_from(args).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidMaxDuration(_))
        ));
    }
}

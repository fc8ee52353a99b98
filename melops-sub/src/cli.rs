//! CLI argument definitions using clap.

use clap::{CommandFactory, Parser};
use eyre::Result;
use melops_seg::normalize::Mode;
use std::path::PathBuf;

/// Default maximum audio segment duration in seconds (5 minutes)
const DEFAULT_MAX_SEGMENT_DURATION: f64 = 300.0;

/// Default minimum silence for a natural split in seconds
const DEFAULT_MIN_SILENCE: f64 = 0.5;

/// Default search factor past the maximum duration
const DEFAULT_FORCED_SPLIT_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Parser)]
#[command(name = "mel-sub")]
#[command(about = "Convert ASR transcripts to SRT subtitles")]
#[command(version)]
pub struct Cli {
    /// Path to transcript JSON
    pub path: Option<PathBuf>,

    /// Output SRT path (default: same as input with .srt extension)
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print the first and last subtitles to stdout
    #[arg(long)]
    pub preview: bool,
}

/// Subtitle generation mode flags.
#[derive(clap::Args, Clone, Copy, Debug, Default)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// One subtitle per recognizer segment (default)
    #[arg(long)]
    pub segment: bool,

    /// One subtitle per recognized token
    #[arg(long)]
    pub word_level: bool,

    /// Every stage enabled, tuned for speech synthesis
    #[arg(long)]
    pub tts_optimized: bool,
}

impl From<ModeArgs> for Mode {
    fn from(args: ModeArgs) -> Self {
        if args.word_level {
            Mode::WordLevel
        } else if args.tts_optimized {
            Mode::TtsOptimized
        } else {
            Mode::Segment
        }
    }
}

/// Overrides applied on top of the mode's policy preset.
///
/// Durations are in seconds.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct PolicyArgs {
    /// Shorter subtitles are merged or extended
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Merges never exceed this duration
    #[arg(long)]
    pub max_duration: Option<f64>,

    /// Target duration when extending short subtitles
    #[arg(long)]
    pub optimal_duration: Option<f64>,

    /// Neighbors closer than this are merged
    #[arg(long)]
    pub merge_threshold: Option<f64>,

    /// Longer subtitles are split
    #[arg(long)]
    pub split_threshold: Option<f64>,

    /// Longer average time per token is an anomaly
    #[arg(long)]
    pub max_token_duration: Option<f64>,

    /// Lower mean token probability is an anomaly
    #[arg(long)]
    pub min_confidence: Option<f32>,

    /// More repetitions of one phrase are an anomaly
    #[arg(long = "max-repetition")]
    pub max_repetition_count: Option<usize>,

    /// Shorter text (in characters) is dropped
    #[arg(long)]
    pub min_text_length: Option<usize>,

    /// Additional case-insensitive exclusion pattern (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclusion_patterns: Vec<String>,

    /// Disable smart merge
    #[arg(long)]
    pub no_merge: bool,

    /// Disable smart split
    #[arg(long)]
    pub no_split: bool,

    /// Disable anomaly detection
    #[arg(long)]
    pub no_anomaly: bool,
}

#[derive(Debug, Parser)]
#[command(name = "mel-vad")]
#[command(about = "Split a VAD timeline into bounded audio segments")]
#[command(version)]
pub struct VadCli {
    /// Path to VAD result JSON
    pub path: Option<PathBuf>,

    /// Output JSON path (default: same as input with .segments.json extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub segmenter: SegmenterArgs,
}

/// Audio segmentation settings in seconds.
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct SegmenterArgs {
    /// Maximum segment duration
    #[arg(long, default_value_t = DEFAULT_MAX_SEGMENT_DURATION)]
    pub max_duration: f64,

    /// Shortest silence accepted as a split point
    #[arg(long, default_value_t = DEFAULT_MIN_SILENCE)]
    pub min_silence: f64,

    /// How far past the maximum duration to look for silence
    #[arg(long, default_value_t = DEFAULT_FORCED_SPLIT_MULTIPLIER)]
    pub forced_split_multiplier: f64,
}

/// Execute subtitle conversion - separated for testing.
///
/// Prints usage and succeeds when no input path is given.
pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    if cli.path.is_none() {
        Cli::command().print_help()?;
        return Ok(());
    }

    crate::convert::execute(cli.try_into()?)
}

/// Execute audio segmentation - separated for testing.
///
/// Prints usage and succeeds when no input path is given.
pub fn run_vad(cli: VadCli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    if cli.path.is_none() {
        VadCli::command().print_help()?;
        return Ok(());
    }

    crate::vad::execute(cli.try_into()?)
}

//! Split a VAD timeline into bounded audio segments.

use crate::cli::VadCli;
use crate::config::SegmenterConfig;
use crate::convert::format_secs;
use eyre::{Context, OptionExt, Result};
use melops_seg::input::VadResult;
use std::path::PathBuf;
use std::time::Instant;

/// Resolved configuration for audio segmentation.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub segmenter: SegmenterConfig,
}

impl TryFrom<VadCli> for Config {
    type Error = eyre::Error;

    fn try_from(cli: VadCli) -> Result<Self> {
        Ok(Self {
            path: cli.path.ok_or_eyre("missing vad result path")?,
            output: cli.output,
            segmenter: cli.segmenter.try_into()?,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let output = config
        .output
        .unwrap_or_else(|| config.path.with_extension("segments.json"));

    let vad = VadResult::from_path(&config.path)
        .wrap_err_with(|| format!("failed to load vad result: {:?}", config.path.display()))?;

    tracing::info!(
        input = ?config.path.display(),
        intervals = vad.intervals.len(),
        speech = %format_secs(vad.speech_duration().as_secs_f32()),
        "segmenting audio"
    );

    let s = Instant::now();

    let segmentation = config.segmenter.segmenter.segment(&vad.intervals);

    let d = s.elapsed();
    tracing::info!(
        duration = %format_secs(d.as_secs_f32()),
        segments = segmentation.segments.len(),
        "segmentation completed"
    );

    if !segmentation.warnings.is_empty() {
        tracing::warn!(
            count = segmentation.warnings.len(),
            "dropped degenerate intervals"
        );
    }

    let json = serde_json::to_string_pretty(&segmentation.segments)?;

    tracing::info!(path = ?output.display(), "write segments file");

    std::fs::write(&output, json)
        .wrap_err_with(|| format!("failed to write segments: {:?}", output.display()))?;

    Ok(())
}

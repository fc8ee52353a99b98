//! Convert a recognizer transcript to an SRT file.

use crate::cli::Cli;
use crate::config::SynthesisConfig;
use crate::srt;
use color_eyre::Section;
use eyre::{Context, OptionExt, Result};
use melops_seg::input::Transcript;
use melops_seg::normalize::{Synthesis, Synthesizer};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Resolved configuration for subtitle conversion.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub preview: bool,
    pub synthesis: SynthesisConfig,
}

impl TryFrom<Cli> for Config {
    type Error = eyre::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        Ok(Self {
            path: cli.path.ok_or_eyre("missing transcript path")?,
            output: cli.output,
            preview: cli.preview,
            synthesis: (cli.mode, cli.policy).try_into()?,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let output = config
        .output
        .unwrap_or_else(|| config.path.with_extension("srt"));

    tracing::info!(
        input = ?config.path.display(),
        output = ?output.display(),
        mode = ?config.synthesis.mode,
        "generating subtitles"
    );

    let synthesis = synthesize_file(&config.path, config.synthesis)?;

    if !synthesis.warnings.is_empty() {
        tracing::warn!(
            count = synthesis.warnings.len(),
            "dropped segments during normalization"
        );
    }

    tracing::info!(path = ?output.display(), "write srt file");

    let text = synthesis.document.to_srt_string();

    std::fs::write(&output, &text)
        .wrap_err_with(|| format!("failed to write srt: {:?}", output.display()))?;

    if config.preview {
        let subtitles = srt::read_back(&text)?;
        println!("{}", srt::preview_subtitles(&subtitles, 3, 3));
    }

    Ok(())
}

/// Load a transcript and run it through the normalization pipeline.
fn synthesize_file(path: &Path, config: SynthesisConfig) -> Result<Synthesis> {
    let transcript = Transcript::from_path(path)
        .wrap_err_with(|| format!("failed to load transcript: {:?}", path.display()))
        .with_suggestion(|| "mel-sub expects whisper-style JSON with a \"transcription\" array")?;

    let synthesizer = Synthesizer::new(config.policy)?;

    let s = Instant::now();

    let synthesis = synthesizer.synthesize(transcript.into_segments(), config.mode);

    let d = s.elapsed();
    tracing::info!(
        duration = %format_secs(d.as_secs_f32()),
        subtitles = synthesis.document.len(),
        "synthesis completed"
    );

    Ok(synthesis)
}

/// Format seconds as a string with two decimal places.
pub(crate) fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}

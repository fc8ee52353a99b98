//! mel-vad - VAD timeline segmenter

use clap::Parser;
use eyre::Result;
use melops_sub::cli::{VadCli, run_vad};

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = melops_sub::init_tracing();

    run_vad(VadCli::parse())
}

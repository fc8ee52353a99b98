//! mel-sub - transcript to subtitle converter

use clap::Parser;
use eyre::Result;
use melops_sub::cli::{Cli, run};

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = melops_sub::init_tracing();

    run(Cli::parse())
}

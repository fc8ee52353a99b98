//! melops-sub: subtitle and audio segmentation command line tools.

pub mod cli;
pub mod config;
pub mod convert;
pub mod srt;
pub mod vad;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Install stderr logging, filtered by `RUST_LOG` with a `warn` default.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_tracing() -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    guard
}

//! Log output for the command line front end.

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Send log events to stderr.
///
/// `RUST_LOG` overrides `default_level`, e.g. `RUST_LOG=expense_tracker=debug`.
/// Stdout is left for the command's own output.
pub fn setup_logging(default_level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();
}

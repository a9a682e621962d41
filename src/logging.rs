//! Tracing subscriber setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// Output goes to stderr so command output on stdout stays clean. A
/// `RUST_LOG` filter replaces the default one, which shows this crate's
/// debug events when `verbose` is set and nothing otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("currency_tracker={level},ctrack={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(env_filter)
        .init();
}

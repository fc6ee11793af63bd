//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `level` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "transla_overlay_rs=info";

/// Install the global fmt subscriber, writing to stderr.
///
/// `level` takes precedence over `RUST_LOG`. Calling this again after a
/// subscriber is installed does nothing.
pub fn init(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid log level {level:?}: {e}");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

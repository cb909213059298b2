use std::fs::OpenOptions;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable naming a file that receives a debug-level log.
pub const LOG_FILE_ENV: &str = "VINE_LOG_FILE";

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, or `debug` with
/// `verbose`). Stdout stays reserved for JSON output.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok() else {
        registry.init();
        return;
    };

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(LevelFilter::DEBUG);
            registry.with(file_layer).init();
            tracing::debug!("File logging enabled: {}", log_path);
        }
        Err(e) => {
            registry.init();
            tracing::warn!("Failed to open log file {}: {}", log_path, e);
        }
    }
}

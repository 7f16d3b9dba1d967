use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log level directives for the stderr layer, e.g. `QUOTEBOARD_LOG=debug`
pub const LOG_FILTER_ENV: &str = "QUOTEBOARD_LOG";

/// When set, a debug-level log is appended to this path as well
pub const LOG_FILE_ENV: &str = "QUOTEBOARD_LOG_FILE";

pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing_with_default(default_directive: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    let file_layer = std::env::var(LOG_FILE_ENV).ok().and_then(|log_path| {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                eprintln!("File logging enabled: {}", log_path);
                Some(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_filter(LevelFilter::DEBUG),
                )
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", log_path, e);
                None
            }
        }
    });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

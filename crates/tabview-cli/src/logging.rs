//! Logging setup for the tabview CLI
//!
//! Console output goes to stderr so that table and CSV output on stdout stay clean.
//! An optional JSON file layer writes daily-rotated logs into the data directory.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files should be written
    pub log_dir: PathBuf,

    /// Whether to write JSON logs to files
    pub enable_json_logs: bool,

    pub enable_console_logs: bool,

    /// Default log level filter, used when RUST_LOG is unset
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            enable_json_logs: false,
            enable_console_logs: true,
            default_filter: "warn,tabview_table=info,tabview_cli=info".to_string(),
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.default_filter = "info,tabview_table=debug,tabview_cli=debug".to_string();
        }
        self
    }

    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Initialize the subscriber; the returned guard must be held until exit to flush file logs
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    // RUST_LOG environment variable takes precedence over default filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter.clone())
            .boxed();
        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "tabview.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "Logging system initialized"
    );

    Ok(guard)
}

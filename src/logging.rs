//! Logging configuration
//!
//! An explicit configuration object constructed once at process start and
//! handed to [`init`], rather than process-wide implicit state mutated at
//! import time. Output goes to two sinks: the console and a persistent log
//! file, both with timestamp/target/level formatting.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::Result;

/// Where and how verbosely to log.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Log file path; `None` disables the file sink.
    pub file: Option<PathBuf>,
    /// Default filter directive, overridable via `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("training.log")),
            filter: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Set the log file path.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the default filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Install the global subscriber for this process.
///
/// Call once, before any component logs. Returns an error if the log file
/// cannot be created; panics if a subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let console = tracing_subscriber::fmt::layer();

    match &config.file {
        Some(path) => {
            let file = File::create(path)?;
            let sink = tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(sink)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
        }
    }

    Ok(())
}

//! Subscriber setup for the `rocket-race` binary.
//!
//! Library crates only emit `tracing` events; this module picks the filter,
//! the output format and where the lines go.
//!
//! Levels used across the workspace:
//!
//! - `error`: no tier yielded a dataset
//! - `warn`: tier fallbacks, skipped records, ignored config or mapping files
//! - `info`: selected tier and the refresh summary
//! - `debug`: per-tier attempts and file discovery
//!
//! ```ignore
//! use race_cli::logging::{LogConfig, LogFormat, init_logging};
//!
//! init_logging(&LogConfig::default().with_format(LogFormat::Compact))?;
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Crates whose events follow the configured level; everything else stays at warn.
const WORKSPACE_TARGETS: [&str; 6] = [
    "rocket_race",
    "race_analytics",
    "race_cli",
    "race_ingest",
    "race_model",
    "race_normalization",
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the computed directives.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    /// Emit span close events (json only).
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Directives used when `RUST_LOG` is ignored or unset.
    fn directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        std::iter::once("warn".to_string())
            .chain(
                WORKSPACE_TARGETS
                    .iter()
                    .map(|target| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        if self.use_env_filter
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        EnvFilter::new(self.directives())
    }

    fn make_writer(&self) -> io::Result<BoxMakeWriter> {
        match &self.log_file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(BoxMakeWriter::new(Mutex::new(file)))
            }
            None => Ok(BoxMakeWriter::new(io::stderr)),
        }
    }

    fn fmt_layer(&self, writer: BoxMakeWriter) -> BoxedLayer {
        let base = fmt::layer()
            .with_writer(writer)
            .with_target(self.with_target);
        match (self.format, self.with_timestamps) {
            (LogFormat::Json, _) => {
                let spans = if self.with_spans {
                    FmtSpan::CLOSE
                } else {
                    FmtSpan::NONE
                };
                base.json().with_span_events(spans).boxed()
            }
            (LogFormat::Compact, true) => base.compact().with_ansi(self.with_ansi).boxed(),
            (LogFormat::Compact, false) => base
                .compact()
                .with_ansi(self.with_ansi)
                .without_time()
                .boxed(),
            (LogFormat::Pretty, true) => base.with_ansi(self.with_ansi).boxed(),
            (LogFormat::Pretty, false) => base.with_ansi(self.with_ansi).without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = config.make_writer()?;
    tracing_subscriber::registry()
        .with(config.fmt_layer(writer))
        .with(config.env_filter())
        .try_init()
        .map_err(io::Error::other)
}

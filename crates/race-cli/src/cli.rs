//! CLI argument definitions for the rocket race dashboard.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use race_analytics::RowLimit;
use race_cli::logging::{LogConfig, LogFormat};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "rocket-race",
    version,
    about = "Rocket race dashboard - leaderboard and race facts in the terminal",
    long_about = "Reconcile rocket race telemetry into a single ranked dataset.\n\n\
                  Reads the live results file when a race has completed, otherwise the\n\
                  newest backup results file, otherwise the participant list."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the race files (default: current directory).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Dashboard config file (default: <DATA_DIR>/rocket-race.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the session summary, statistics and source diagnostics.
    Status,

    /// Show the ranked leaderboard.
    Leaderboard(LeaderboardArgs),

    /// Find racers by username.
    Search(SearchArgs),

    /// Show the race superlatives.
    Facts,

    /// Write the full dashboard snapshot as JSON.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct LeaderboardArgs {
    /// Number of rows, or "all" (default: leaderboard_top from the config).
    #[arg(long = "top", value_name = "N|all")]
    pub top: Option<RowLimit>,

    /// Hide racers faster than this many seconds.
    #[arg(long = "min-time", value_name = "SECONDS")]
    pub min_time: Option<f64>,

    /// Hide racers slower than this many seconds.
    #[arg(long = "max-time", value_name = "SECONDS")]
    pub max_time: Option<f64>,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Username fragment, with or without a leading '@'.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Match letter case exactly.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Also match against full names.
    #[arg(long = "full-name")]
    pub full_name: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Logging setup implied by the flags.
    ///
    /// `--log-level` beats `-v`/`-q`; either one disables `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.verbosity.is_present() || self.log_level.is_some();
        let level = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            use_env_filter: !explicit,
            with_ansi,
            ..LogConfig::default()
        }
        .with_level_filter(level)
        .with_format(self.log_format.into())
        .with_log_file(self.log_file.clone())
    }
}

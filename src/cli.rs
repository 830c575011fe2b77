use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments. Values given here override `settings.json`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "heliorama")]
#[command(about = "Heliocentric planet orbits in the terminal", long_about = None)]
pub(crate) struct Args {
    /// Start paused
    #[arg(long, default_value_t = false)]
    pub(crate) paused: bool,

    /// Start zoomed on the inner planets
    #[arg(long, default_value_t = false)]
    pub(crate) inner: bool,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    pub(crate) mono: bool,

    /// Simulated start time, RFC 3339. Example: 2030-01-01T00:00:00Z
    #[arg(long)]
    pub(crate) start: Option<DateTime<Utc>>,

    /// Log level filter (error, warn, info, debug, trace). RUST_LOG wins.
    #[arg(long)]
    pub(crate) log_level: Option<String>,

    /// Log file path (default: heliorama.log in the data directory)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// Directory holding settings.json (overrides the platform default)
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,
}

//! Command-line interface definitions and parsing

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "handoff", version, about = "Hand a large buffer to a background worker, by copy or by transfer", long_about = None)]
pub struct Cli {
    /// Size of the buffer allocated per run, in megabytes
    #[arg(short, long)]
    pub buffer_mb: Option<usize>,

    /// Start with transfer mode enabled
    #[arg(short, long)]
    pub transfer: bool,

    /// Pause between logging the intent and allocating, in milliseconds
    #[arg(long)]
    pub render_delay_ms: Option<u64>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Perform N runs and exit instead of reading commands from stdin
    #[arg(short, long)]
    pub runs: Option<u32>,

    /// Print log entries and reports as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weekly class timetable builder.
///
/// Enumerates every conflict-free way to pick one section per course and
/// can ask an LLM for workarounds when no combination exists.
#[derive(Debug, Parser)]
#[command(name = "tb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Enumerate all conflict-free schedules for a course dataset.
    Solve {
        /// Path to the course dataset (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Output schedules as JSON instead of a human-readable listing.
        #[arg(long)]
        json: bool,

        /// Fan out top-level search branches across worker threads.
        #[arg(long)]
        parallel: bool,

        /// Pin a course to one section before searching (repeatable).
        #[arg(long = "lock", value_name = "COURSE=SECTION")]
        locks: Vec<String>,
    },

    /// Validate a course dataset without searching.
    Check {
        /// Path to the course dataset (JSON).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Ask for workarounds when no conflict-free schedule exists.
    Advise {
        /// Path to the course dataset (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Tag the conflict as exam-period-based rather than time-based.
        #[arg(long)]
        exam_period: bool,

        /// Model to query (defaults to the configured model).
        #[arg(long)]
        model: Option<String>,
    },
}

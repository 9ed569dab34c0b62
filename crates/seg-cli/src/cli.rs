//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use seg_core::{EntryPath, ExportFormat};

/// Segment time tracker.
///
/// Tracks nested work segments inside a `simple-time-tracker` code block of
/// a Markdown document. Entries are addressed by their one-based position,
/// e.g. `2` or `2.1` for the first part of the second entry.
#[derive(Debug, Parser)]
#[command(name = "seg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Which tracker block of the document to use (zero-based).
    #[arg(short, long, global = true, default_value_t = 0)]
    pub block: usize,

    /// Overwrite a tracker block that cannot be parsed.
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add an empty tracker block to a document.
    Init {
        /// Markdown document.
        document: PathBuf,
    },

    /// Start a new segment.
    Start {
        document: PathBuf,

        /// Segment name (defaults to "Segment N").
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Stop the running segment.
    Stop {
        document: PathBuf,

        /// Rename the segment as it stops.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Stop the running segment and start the next one.
    Next {
        document: PathBuf,

        /// Rename the segment being stopped.
        #[arg(long)]
        finished_name: Option<String>,

        /// Name of the new segment.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Continue an existing segment as a new part.
    Split {
        document: PathBuf,

        /// Entry to continue, e.g. `2` or `2.1`.
        path: EntryPath,

        /// Name of the new part (defaults to "Part N").
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove a segment.
    Remove { document: PathBuf, path: EntryPath },

    /// Rename a segment.
    Rename {
        document: PathBuf,
        path: EntryPath,
        name: String,
    },

    /// Change a segment's start or end time.
    Edit {
        document: PathBuf,
        path: EntryPath,

        /// New start time, "MM/DD/YYYY HH:mm" in local time.
        #[arg(long)]
        start: Option<String>,

        /// New end time, "MM/DD/YYYY HH:mm" in local time.
        #[arg(long)]
        end: Option<String>,
    },

    /// Show segments grouped by day.
    Show { document: PathBuf },

    /// Print an export of the tracker.
    Export {
        document: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ExportFormatArg::Table)]
        format: ExportFormatArg,

        /// CSV field separator (overrides the configured one).
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Upload the Turtle export.
    Upload { document: PathBuf },

    /// Show the running segment and today's total, refreshed every second.
    Watch { document: PathBuf },
}

/// Export format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// Markdown table with a total row.
    #[value(alias = "markdown")]
    Table,
    /// Delimiter-separated rows.
    Csv,
    /// Turtle triples.
    #[value(alias = "ttl")]
    Turtle,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Table => Self::Table,
            ExportFormatArg::Csv => Self::Csv,
            ExportFormatArg::Turtle => Self::Turtle,
        }
    }
}

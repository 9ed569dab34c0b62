//! Text exports of a tracker: Markdown table, CSV and Turtle triples.
//!
//! Exports never modify the tracker. Running entries are measured against
//! the clock at the time of export.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::aggregate::{duration, format_duration, total_duration};
use crate::clock::Clock;
use crate::entry::{Entry, Tracker, flatten};
use crate::types::ValidationError;

/// Display pattern for timestamps in every export (`MM/DD/YYYY HH:mm`).
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Pattern for `xsd:dateTime` literals: local time, second precision, no offset.
const TRIPLE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TABLE_HEADER: [&str; 4] = ["Segment", "Start time", "End time", "Duration"];

const TURTLE_PREFIXES: &str = "prefix ts: <https://business.data.world/timesheet>\n\
                               prefix xsd: <http://www.w3.org/2001/XMLSchema#>\n\
                               prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n";

const ENTRY_IRI_BASE: &str = "https://business.data.world/data/timesheets/TE";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// User-configurable export options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Field separator for CSV exports.
    pub csv_delimiter: String,

    /// Configured timestamp pattern.
    ///
    /// Accepted for compatibility; exports always use
    /// [`DISPLAY_TIMESTAMP_FORMAT`].
    pub timestamp_format: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            csv_delimiter: ",".to_string(),
            timestamp_format: "YY-MM-DD hh:mm:ss".to_string(),
        }
    }
}

/// The available export representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Padded Markdown table with a total row.
    Table,
    /// Delimiter-separated rows.
    Csv,
    /// Turtle triples.
    Turtle,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Turtle => "turtle",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" | "markdown" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "turtle" | "ttl" => Ok(Self::Turtle),
            _ => Err(ValidationError::UnknownExportFormat {
                value: s.to_string(),
            }),
        }
    }
}

/// Renders exports of a tracker with the given settings and clock.
pub struct Exporter<'a, C: Clock> {
    settings: &'a ExportSettings,
    clock: &'a C,
}

impl<'a, C: Clock> Exporter<'a, C> {
    pub const fn new(settings: &'a ExportSettings, clock: &'a C) -> Self {
        Self { settings, clock }
    }

    /// Renders `tracker` in the requested format.
    pub fn render(&self, format: ExportFormat, tracker: &Tracker) -> String {
        match format {
            ExportFormat::Table => self.markdown_table(tracker),
            ExportFormat::Csv => self.csv(tracker),
            ExportFormat::Turtle => self.triples(tracker),
        }
    }

    /// Formats epoch seconds for display.
    ///
    /// The pattern is fixed; `timestamp_format` is not consulted.
    pub fn format_timestamp(&self, secs: i64) -> String {
        self.clock
            .local_datetime(secs)
            .map(|dt| dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// One row per entry, depth-first: name, start, end and duration.
    ///
    /// Missing timestamps render empty. The duration is shown once an entry
    /// has ended or has been split.
    pub fn rows(&self, tracker: &Tracker) -> Vec<[String; 4]> {
        flatten(&tracker.entries)
            .map(|(_, entry)| self.row(entry))
            .collect()
    }

    fn row(&self, entry: &Entry) -> [String; 4] {
        let start = entry
            .start_time
            .map(|secs| self.format_timestamp(secs))
            .unwrap_or_default();
        let end = entry
            .end_time
            .map(|secs| self.format_timestamp(secs))
            .unwrap_or_default();
        let duration = if entry.end_time.is_some() || entry.is_branch() {
            format_duration(duration(entry, self.clock))
        } else {
            String::new()
        };
        [entry.name.clone(), start, end, duration]
    }

    /// Markdown table padded for monospace display, with a total row.
    pub fn markdown_table(&self, tracker: &Tracker) -> String {
        let mut table: Vec<[String; 4]> = vec![TABLE_HEADER.map(String::from)];
        table.extend(self.rows(tracker));
        table.push([
            "**Total**".to_string(),
            String::new(),
            String::new(),
            format!(
                "**{}**",
                format_duration(total_duration(&tracker.entries, self.clock))
            ),
        ]);

        let widths: [usize; 4] = std::array::from_fn(|column| {
            table
                .iter()
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        });

        let mut output = String::new();
        for (index, row) in table.iter().enumerate() {
            if index == 1 {
                let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                output.push_str(&separator.join(" | "));
                output.push('\n');
            }
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            output.push_str(&cells.join(" | "));
            output.push('\n');
        }
        output
    }

    /// Delimiter-separated rows, one line per entry, no header or total.
    ///
    /// Fields are not quoted.
    pub fn csv(&self, tracker: &Tracker) -> String {
        let mut output = String::new();
        for row in self.rows(tracker) {
            output.push_str(&row.join(&self.settings.csv_delimiter));
            output.push('\n');
        }
        output
    }

    /// Turtle statements describing every entry.
    pub fn triples(&self, tracker: &Tracker) -> String {
        let mut output = TURTLE_PREFIXES.to_string();
        for (_, entry) in flatten(&tracker.entries) {
            output.push_str(&self.entry_triples(entry));
        }
        output
    }

    #[allow(clippy::cast_precision_loss)]
    fn entry_triples(&self, entry: &Entry) -> String {
        let mut statements = vec![
            format!("{} a ts:Entry ;", self.entry_iri(entry)),
            format!("   rdfs:label \"{}\" ;", escape_literal(&entry.name)),
        ];
        if let Some(start) = entry.start_time {
            statements.push(format!(
                "   ts:startTime \"{}\"^^xsd:dateTime ;",
                self.standard_timestamp(start)
            ));
        }
        if let Some(end) = entry.end_time {
            statements.push(format!(
                "   ts:endTime \"{}\"^^xsd:dateTime ;",
                self.standard_timestamp(end)
            ));
        }
        let minutes = duration(entry, self.clock) as f64 / 60_000.0;
        statements.push(format!("   ts:duration {minutes} . "));

        let mut output = statements.join("\n");
        output.push('\n');
        output
    }

    /// IRI built from the name and display timestamps with every
    /// non-alphanumeric character removed.
    fn entry_iri(&self, entry: &Entry) -> String {
        let start = entry
            .start_time
            .map(|secs| self.format_timestamp(secs))
            .unwrap_or_default();
        let end = entry
            .end_time
            .map(|secs| self.format_timestamp(secs))
            .unwrap_or_default();
        format!(
            "<{ENTRY_IRI_BASE}{}{}{}>",
            NON_ALPHANUMERIC.replace_all(&entry.name, ""),
            NON_ALPHANUMERIC.replace_all(&start, ""),
            NON_ALPHANUMERIC.replace_all(&end, ""),
        )
    }

    fn standard_timestamp(&self, secs: i64) -> String {
        self.clock
            .local_datetime(secs)
            .map(|dt| dt.format(TRIPLE_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }
}

fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

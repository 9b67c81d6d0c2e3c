//! Report rendering and the test-suite suggestion.
//!
//! The text report is a fixed header, one `key: value` line per aggregated
//! metric, a blank line, then a single `[Agent Suggestion]` line.

use crate::metric::MetricTable;
use serde::Serialize;
use std::io::Write;

pub const HEADER: &str = "=== BRI Agent Analysis (Placeholder) ===";

/// Value assumed for the tests-total metric when no log reports it.
pub const DEFAULT_TESTS_TOTAL: &str = "0";

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The single next-step suggestion printed after the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// No real test count was reported.
    TrivialTests,
    /// Some test count was reported; look at coverage next.
    NonTrivial,
}

impl Suggestion {
    /// Pick a suggestion from the raw tests-total string.
    ///
    /// This is a string check, not a numeric one: `""`, `"0"` and anything
    /// starting with `tests/` count as "no real count", everything else
    /// (including `"abc"`) as non-trivial.
    pub fn for_tests_total(tests_total: &str) -> Self {
        if tests_total.is_empty() || tests_total == "0" || tests_total.starts_with("tests/") {
            Suggestion::TrivialTests
        } else {
            Suggestion::NonTrivial
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::TrivialTests => "[Agent Suggestion] Only 1 trivial test detected. Consider adding more scenario-based tests for the custom components.",
            Suggestion::NonTrivial => "[Agent Suggestion] Test suite size looks non-trivial; next step is to analyze coverage and failure patterns.",
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Aggregated metrics plus the derived suggestion.
#[derive(Debug, Serialize)]
pub struct Report {
    pub metrics: MetricTable,
    pub tests_total: String,
    pub suggestion: Suggestion,
    pub message: &'static str,
}

impl Report {
    /// Build a report, reading the tests total from `tests_total_key`.
    pub fn new(metrics: MetricTable, tests_total_key: &str) -> Self {
        let tests_total = metrics
            .get(tests_total_key)
            .unwrap_or(DEFAULT_TESTS_TOTAL)
            .to_string();
        let suggestion = Suggestion::for_tests_total(&tests_total);
        tracing::debug!(
            key = tests_total_key,
            tests_total = %tests_total,
            ?suggestion,
            "selected suggestion"
        );
        Self {
            metrics,
            tests_total,
            suggestion,
            message: suggestion.message(),
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        writeln!(out, "{HEADER}")?;
        for (key, value) in self.metrics.iter() {
            writeln!(out, "{key}: {value}")?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.suggestion)?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *out, self).map_err(ReportError::Serialize)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<(), ReportError> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Json => self.write_json(out),
        }
    }
}

/// Errors from writing a report.
#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "failed to write report: {e}"),
            ReportError::Serialize(e) => write!(f, "failed to serialize report: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e)
    }
}

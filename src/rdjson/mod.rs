/// Reviewdog Diagnostic Format (rdjson) reports, read leniently for logging.
mod parse;

pub use parse::{Summary, parse_report};

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Unknown,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Self::Error => 3,
            Self::Warning => 2,
            Self::Info => 1,
            Self::Unknown => 0,
        }
    }

    pub(crate) fn from_str_lossy(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Self::Error,
            "WARNING" => Self::Warning,
            "INFO" => Self::Info,
            _ => Self::Unknown,
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
            Self::Info => f.write_str("info"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Top-level rdjson document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Report {
    pub source: Option<Source>,
    pub severity: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Source {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<Location>,
    pub severity: Option<String>,
    pub code: Option<Code>,
}

impl Diagnostic {
    /// Own severity, else the report-level one, else unknown.
    pub fn effective_severity(&self, report_default: Option<&str>) -> Severity {
        self.severity
            .as_deref()
            .or(report_default)
            .map(Severity::from_str_lossy)
            .unwrap_or(Severity::Unknown)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub path: String,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Range {
    pub start: Position,
    pub end: Option<Position>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Code {
    pub value: String,
    pub url: Option<String>,
}

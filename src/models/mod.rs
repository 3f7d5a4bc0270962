//! Plain aggregate values for the report tree, plus the driver event schema.
//!
//! The tree is built by the aggregator and serialized by the writer; nothing
//! here knows about XML.

pub mod event;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Classification of a finding. Parsing is case-insensitive; display is
/// always uppercase.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One reported rule violation. Immutable once built.
pub struct Finding {
    pub line: u32,
    pub check: String,
    pub message: String,
    pub severity: Severity,
    /// Display block: `SEVERITY: message`, `Category`, `File`, `Line`.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A closed per-file section.
///
/// `tests` and `failures` both count findings: every finding is modeled as
/// a failing test case, there is no notion of a passing one.
pub struct FileSection {
    pub name: String,
    pub tests: u64,
    pub failures: u64,
    /// Seconds the section was open.
    pub time: f64,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Root aggregate for a whole run. Sections keep scan order.
pub struct Report {
    pub id: String,
    pub name: String,
    pub tests: u64,
    pub failures: u64,
    pub time: f64,
    pub sections: Vec<FileSection>,
}

impl Report {
    pub(crate) fn new(id: String, name: String) -> Self {
        Report {
            id,
            name,
            tests: 0,
            failures: 0,
            time: 0.0,
            sections: Vec::new(),
        }
    }

    /// Append a closed section and fold its counters into the totals.
    pub(crate) fn push_section(&mut self, section: FileSection) {
        self.tests += section.tests;
        self.failures += section.failures;
        self.time += section.time;
        self.sections.push(section);
    }
}

//! Event stream schema read by the binary driver.

use super::Severity;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
/// One driver call, in the order it should be replayed.
pub enum Event {
    /// Scanning moved to a new file.
    File { path: String },
    /// A rule violation in the current file.
    Finding {
        line: u32,
        check: String,
        #[serde(default)]
        message: String,
        #[serde(default = "default_severity")]
        severity: Severity,
    },
}

fn default_severity() -> Severity {
    Severity::Warning
}

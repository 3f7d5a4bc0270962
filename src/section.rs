//! Per-file section construction.
//!
//! `SectionBuilder` turns one driver call into a `Finding`; `OpenSection` is
//! the in-progress accumulator the aggregator owns until the section closes.

use crate::clock::elapsed_secs;
use crate::error::{ReportError, Result};
use crate::models::{FileSection, Finding, Severity};
use chrono::{DateTime, Utc};

/// Strip a single leading `./` from a scanned path.
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// Stateless composer for findings and their display blocks.
pub struct SectionBuilder;

impl SectionBuilder {
    /// Build a finding for a section named `file`.
    ///
    /// Rejects `line == 0` and blank check ids.
    pub fn finding(
        file: &str,
        line: u32,
        check: &str,
        message: &str,
        severity: Severity,
    ) -> Result<Finding> {
        if line == 0 {
            return Err(ReportError::Validation(format!(
                "line must be positive (check '{}')",
                check
            )));
        }
        if check.trim().is_empty() {
            return Err(ReportError::Validation(format!(
                "check id is empty (line {})",
                line
            )));
        }
        Ok(Finding {
            line,
            check: check.to_string(),
            message: message.to_string(),
            severity,
            body: Self::body(file, line, check, message, severity),
        })
    }

    pub fn body(file: &str, line: u32, check: &str, message: &str, severity: Severity) -> String {
        format!(
            "{}: {}\nCategory: {}\nFile: {}\nLine: {}",
            severity, message, check, file, line
        )
    }
}

/// A section that is still receiving findings.
#[derive(Debug)]
pub struct OpenSection {
    name: String,
    started: DateTime<Utc>,
    findings: Vec<Finding>,
}

impl OpenSection {
    pub fn open(path: &str, started: DateTime<Utc>) -> Self {
        OpenSection {
            name: normalize_path(path).to_string(),
            started,
            findings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Finish the section at `now`. Each finding counts once as a test and
    /// once as a failure.
    pub fn close(self, now: DateTime<Utc>) -> FileSection {
        let count = self.findings.len() as u64;
        FileSection {
            name: self.name,
            tests: count,
            failures: count,
            time: elapsed_secs(self.started, now),
            findings: self.findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_strips_single_dot_slash() {
        assert_eq!(normalize_path("./a.php"), "a.php");
        assert_eq!(normalize_path("a.php"), "a.php");
        assert_eq!(normalize_path("././a.php"), "./a.php");
        assert_eq!(normalize_path("../a.php"), "../a.php");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_body_layout() {
        let f = SectionBuilder::finding("src/a.php", 10, "indent", "bad indent", Severity::Error)
            .unwrap();
        assert_eq!(
            f.body,
            "ERROR: bad indent\nCategory: indent\nFile: src/a.php\nLine: 10"
        );
        assert_eq!(f.check, "indent");
        assert_eq!(f.line, 10);
    }

    #[test]
    fn test_rejects_zero_line_and_blank_check() {
        let err = SectionBuilder::finding("a", 0, "x", "m", Severity::Info).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        let err = SectionBuilder::finding("a", 1, "  ", "m", Severity::Info).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_close_counts_findings_and_time() {
        let t0 = DateTime::<Utc>::UNIX_EPOCH;
        let mut open = OpenSection::open("./b.php", t0);
        for line in [1, 2, 3] {
            let f = SectionBuilder::finding(open.name(), line, "c", "m", Severity::Warning)
                .unwrap();
            open.push(f);
        }
        let closed = open.close(t0 + Duration::milliseconds(250));
        assert_eq!(closed.name, "b.php");
        assert_eq!(closed.tests, 3);
        assert_eq!(closed.failures, 3);
        assert_eq!(closed.time, 0.25);
        assert_eq!(closed.findings[2].line, 3);
    }
}

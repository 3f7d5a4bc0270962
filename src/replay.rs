//! Driver side: load a recorded event stream and replay it through the
//! aggregator lifecycle.

use crate::aggregator::ReportAggregator;
use crate::clock::Clock;
use crate::error::{ReportError, Result};
use crate::models::event::Event;
use crate::models::Report;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse events from `path`. `.jsonl` means one event per line; anything
/// else is read as a JSON array.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let raw = fs::read_to_string(path).map_err(|e| ReportError::Input {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let jsonl = path.extension().is_some_and(|ext| ext == "jsonl");
    parse_events(&raw, jsonl).map_err(|message| ReportError::Input {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse_events(raw: &str, jsonl: bool) -> std::result::Result<Vec<Event>, String> {
    if !jsonl {
        return serde_json::from_str(raw).map_err(|e| e.to_string());
    }
    raw.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| serde_json::from_str(l).map_err(|e| format!("line {}: {}", i + 1, e)))
        .collect()
}

/// Run a whole session: `start`, every event in order, then `stop`.
pub fn replay<C: Clock>(
    agg: &mut ReportAggregator<C>,
    events: &[Event],
) -> Result<(Report, PathBuf)> {
    agg.start()?;
    for event in events {
        match event {
            Event::File { path } => agg.begin_file(path)?,
            Event::Finding {
                line,
                check,
                message,
                severity,
            } => agg.record_finding(*line, check, message, *severity)?,
        }
    }
    debug!(events = events.len(), "replayed events");
    let path = agg.stop()?;
    let report = agg.report().cloned().ok_or(ReportError::State {
        operation: "stop",
        state: "open",
    })?;
    Ok((report, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_parse_json_array() {
        let raw = r#"[
            {"event": "file", "path": "./a.php"},
            {"event": "finding", "line": 4, "check": "indent", "message": "m", "severity": "Error"},
            {"event": "finding", "line": 5, "check": "naming"}
        ]"#;
        let events = parse_events(raw, false).unwrap();
        assert_eq!(
            events[0],
            Event::File {
                path: "./a.php".into()
            }
        );
        assert_eq!(
            events[1],
            Event::Finding {
                line: 4,
                check: "indent".into(),
                message: "m".into(),
                severity: Severity::Error,
            }
        );
        match &events[2] {
            Event::Finding { severity, message, .. } => {
                assert_eq!(*severity, Severity::Warning);
                assert!(message.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_jsonl_reports_line_number() {
        let raw = "{\"event\":\"file\",\"path\":\"a\"}\n\n{\"event\":\"finding\",\"line\":-1,\"check\":\"x\"}\n";
        let err = parse_events(raw, true).unwrap_err();
        assert!(err.starts_with("line 3:"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_unknown_severity() {
        let raw = r#"[{"event":"finding","line":1,"check":"x","severity":"fatal"}]"#;
        assert!(parse_events(raw, false).is_err());
    }
}

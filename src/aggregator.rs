//! Report aggregator: the lifecycle state machine behind `start`,
//! `begin_file`, `record_finding` and `stop`.
//!
//! States run `NotStarted -> Open -> Finalized` and never go back. A failed
//! `stop` lands in `Failed`, which rejects every further call.
//!
//! Single caller only: there is no internal locking and none of the
//! operations block except the one write performed by `stop`.

use crate::clock::{Clock, SystemClock};
use crate::config::ReporterConfig;
use crate::error::{ReportError, Result};
use crate::models::{Report, Severity};
use crate::section::{OpenSection, SectionBuilder};
use crate::writer::DocumentWriter;
use chrono::{DateTime, Local, Utc};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
enum State {
    NotStarted,
    Open {
        report: Report,
        active: Option<OpenSection>,
    },
    Finalized(Report),
    Failed,
}

impl State {
    fn label(&self) -> &'static str {
        match self {
            State::NotStarted => "not started",
            State::Open { .. } => "open",
            State::Finalized(_) => "finalized",
            State::Failed => "failed",
        }
    }
}

pub struct ReportAggregator<C: Clock = SystemClock> {
    clock: C,
    writer: DocumentWriter,
    title: String,
    state: State,
}

impl ReportAggregator<SystemClock> {
    pub fn new(cfg: &ReporterConfig) -> Self {
        ReportAggregator::with_clock(cfg, SystemClock)
    }
}

impl<C: Clock> ReportAggregator<C> {
    pub fn with_clock(cfg: &ReporterConfig, clock: C) -> Self {
        ReportAggregator {
            clock,
            writer: DocumentWriter::from_config(cfg),
            title: cfg.title.clone(),
            state: State::NotStarted,
        }
    }

    /// Create the report root with a fresh id and a timestamped name.
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.state, State::NotStarted) {
            return Err(self.state_error("start"));
        }
        let stamp = self
            .clock
            .now()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        let id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{} ({})", self.title, stamp);
        debug!(id = %id, "report started");
        self.state = State::Open {
            report: Report::new(id, name),
            active: None,
        };
        Ok(())
    }

    /// Close the active section, if any, and open one for `path`.
    pub fn begin_file(&mut self, path: &str) -> Result<()> {
        let now = self.clock.now();
        let State::Open { report, active } = &mut self.state else {
            return Err(self.state_error("begin_file"));
        };
        if let Some(open) = active.take() {
            push_closed(report, open, now);
        }
        let section = OpenSection::open(path, now);
        debug!(file = section.name(), "section opened");
        *active = Some(section);
        Ok(())
    }

    /// Attach a finding to the active section, opening an unnamed one when
    /// nothing is active yet. Invalid input leaves the state untouched.
    pub fn record_finding(
        &mut self,
        line: u32,
        check: &str,
        message: &str,
        severity: Severity,
    ) -> Result<()> {
        let clock = &self.clock;
        let State::Open { active, .. } = &mut self.state else {
            return Err(self.state_error("record_finding"));
        };
        let file = active.as_ref().map(OpenSection::name).unwrap_or("");
        let finding = SectionBuilder::finding(file, line, check, message, severity)?;
        active
            .get_or_insert_with(|| {
                debug!("implicit section opened");
                OpenSection::open("", clock.now())
            })
            .push(finding);
        Ok(())
    }

    /// Close the active section, write the document and finalize.
    ///
    /// Returns the path written. On a write failure the aggregator is left
    /// in the failed state and the tree is dropped.
    pub fn stop(&mut self) -> Result<PathBuf> {
        let (mut report, active) = match std::mem::replace(&mut self.state, State::Failed) {
            State::Open { report, active } => (report, active),
            other => {
                let err = ReportError::State {
                    operation: "stop",
                    state: other.label(),
                };
                self.state = other;
                return Err(err);
            }
        };
        if let Some(open) = active {
            push_closed(&mut report, open, self.clock.now());
        }
        let path = self.writer.write(&report)?;
        self.state = State::Finalized(report);
        Ok(path)
    }

    /// The finalized report, once `stop` has succeeded.
    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            State::Finalized(report) => Some(report),
            _ => None,
        }
    }

    fn state_error(&self, operation: &'static str) -> ReportError {
        ReportError::State {
            operation,
            state: self.state.label(),
        }
    }
}

fn push_closed(report: &mut Report, open: OpenSection, now: DateTime<Utc>) {
    let section = open.close(now);
    debug!(
        file = %section.name,
        tests = section.tests,
        failures = section.failures,
        time = section.time,
        "section closed"
    );
    report.push_section(section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ErrorKind;
    use chrono::Duration;

    fn aggregator(dir: &std::path::Path) -> (ReportAggregator<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let cfg = ReporterConfig {
            out_dir: dir.to_path_buf(),
            ..ReporterConfig::default()
        };
        (ReportAggregator::with_clock(&cfg, clock.clone()), clock)
    }

    #[test]
    fn test_calls_before_start_are_state_errors() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agg, _) = aggregator(dir.path());
        assert_eq!(agg.begin_file("a").unwrap_err().kind(), ErrorKind::State);
        assert_eq!(
            agg.record_finding(1, "c", "m", Severity::Error)
                .unwrap_err()
                .kind(),
            ErrorKind::State
        );
        assert_eq!(agg.stop().unwrap_err().kind(), ErrorKind::State);
        // still startable after rejected calls
        agg.start().unwrap();
        assert_eq!(agg.start().unwrap_err().kind(), ErrorKind::State);
    }

    #[test]
    fn test_section_times_follow_clock() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agg, clock) = aggregator(dir.path());
        agg.start().unwrap();
        agg.begin_file("./a.php").unwrap();
        clock.advance(Duration::milliseconds(500));
        agg.record_finding(3, "c", "m", Severity::Warning).unwrap();
        clock.advance(Duration::milliseconds(500));
        agg.begin_file("b.php").unwrap();
        clock.advance(Duration::milliseconds(250));
        agg.stop().unwrap();

        let report = agg.report().unwrap();
        assert_eq!(report.sections[0].name, "a.php");
        assert_eq!(report.sections[0].time, 1.0);
        assert_eq!(report.sections[1].time, 0.25);
        assert_eq!(report.time, 1.25);
    }

    #[test]
    fn test_invalid_finding_does_not_open_section() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agg, _) = aggregator(dir.path());
        agg.start().unwrap();
        let err = agg.record_finding(0, "c", "m", Severity::Error).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        agg.stop().unwrap();
        assert!(agg.report().unwrap().sections.is_empty());
    }

    #[test]
    fn test_failed_stop_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let (mut agg, _) = aggregator(&blocker);
        agg.start().unwrap();
        agg.begin_file("a.php").unwrap();
        assert_eq!(agg.stop().unwrap_err().kind(), ErrorKind::Io);
        assert!(agg.report().is_none());
        assert_eq!(agg.stop().unwrap_err().kind(), ErrorKind::State);
        assert_eq!(agg.begin_file("b.php").unwrap_err().kind(), ErrorKind::State);
    }

    #[derive(Clone, Default)]
    struct CountingClock {
        inner: ManualClock,
        reads: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.set(self.reads.get() + 1);
            self.inner.now()
        }
    }

    #[test]
    fn test_clock_read_only_at_section_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let clock = CountingClock::default();
        let cfg = ReporterConfig {
            out_dir: dir.path().to_path_buf(),
            ..ReporterConfig::default()
        };
        let mut agg = ReportAggregator::with_clock(&cfg, clock.clone());
        agg.start().unwrap();
        assert_eq!(clock.reads.get(), 1);

        // implicit section open reads once, later findings do not
        agg.record_finding(1, "c", "m", Severity::Error).unwrap();
        assert_eq!(clock.reads.get(), 2);
        agg.record_finding(2, "c", "m", Severity::Error).unwrap();
        agg.record_finding(3, "c", "m", Severity::Error).unwrap();
        assert_eq!(clock.reads.get(), 2);

        agg.begin_file("a.php").unwrap();
        assert_eq!(clock.reads.get(), 3);
        agg.record_finding(4, "c", "m", Severity::Warning).unwrap();
        assert_eq!(clock.reads.get(), 3);

        agg.stop().unwrap();
        assert_eq!(clock.reads.get(), 4);
    }

    #[test]
    fn test_stop_without_active_section_skips_clock() {
        let dir = tempfile::tempdir().unwrap();
        let clock = CountingClock::default();
        let cfg = ReporterConfig {
            out_dir: dir.path().to_path_buf(),
            ..ReporterConfig::default()
        };
        let mut agg = ReportAggregator::with_clock(&cfg, clock.clone());
        agg.start().unwrap();
        agg.stop().unwrap();
        assert_eq!(clock.reads.get(), 1);
    }

    #[test]
    fn test_report_id_is_hex_and_name_has_title() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agg, _) = aggregator(dir.path());
        agg.start().unwrap();
        agg.stop().unwrap();
        let report = agg.report().unwrap();
        assert_eq!(report.id.len(), 32);
        assert!(report.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(report.name.starts_with("Style Check Results ("));
        assert!(report.name.ends_with(')'));
    }
}

//! JUnit XML serialization of a finalized `Report`.
//!
//! Shape:
//! - `<testsuites id name tests failures time>` for the report.
//! - `<testsuite name tests failures time>` per file section.
//! - `<testcase id name>` per finding, wrapping a
//!   `<failure type message>` whose text is the finding body.

use crate::config::ReporterConfig;
use crate::error::{ReportError, Result};
use crate::models::{FileSection, Finding, Report};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_FILE_NAME: &str = "style-junit.xml";

fn xml_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Xml(e.to_string())
}

/// Whether `c` is in the XML 1.0 `Char` production. C0 controls other than
/// tab/newline/carriage return are not, nor are U+FFFE and U+FFFF.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Replace characters XML 1.0 cannot carry with U+FFFD. Markup characters
/// are left for quick-xml to escape.
pub fn xml_safe(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}

fn fmt_time(secs: f64) -> String {
    format!("{:.6}", secs)
}

/// Persists a report to `out_dir/file_name`.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    out_dir: PathBuf,
    file_name: String,
}

impl DocumentWriter {
    pub fn new(out_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        DocumentWriter {
            out_dir: out_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_config(cfg: &ReporterConfig) -> Self {
        DocumentWriter::new(cfg.out_dir.clone(), cfg.file_name.clone())
    }

    pub fn destination(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    /// Serialize into memory. Pure; used for previews and tests.
    pub fn render(report: &Report) -> Result<String> {
        let mut buf = Vec::new();
        emit(report, &mut buf)?;
        String::from_utf8(buf).map_err(xml_err)
    }

    /// Write the document in one pass. The output directory is created if
    /// missing; the file handle is released on every path out.
    pub fn write(&self, report: &Report) -> Result<PathBuf> {
        let path = self.destination();
        let written = self.write_to(&path, report);
        match &written {
            Ok(()) => info!(
                path = %path.display(),
                sections = report.sections.len(),
                failures = report.failures,
                "report written"
            ),
            Err(e) => warn!(path = %path.display(), error = %e, "report write failed"),
        }
        written.map(|_| path)
    }

    fn write_to(&self, path: &Path, report: &Report) -> Result<()> {
        fs::create_dir_all(&self.out_dir).map_err(|e| ReportError::io(&self.out_dir, e))?;
        let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
        let mut out = BufWriter::new(file);
        emit(report, &mut out)?;
        out.flush().map_err(|e| ReportError::io(path, e))
    }
}

fn emit<W: Write>(report: &Report, sink: W) -> Result<()> {
    let mut w = Writer::new_with_indent(sink, b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let tests = report.tests.to_string();
    let failures = report.failures.to_string();
    let time = fmt_time(report.time);
    let mut root = BytesStart::new("testsuites");
    root.push_attribute(("id", &*xml_safe(&report.id)));
    root.push_attribute(("name", &*xml_safe(&report.name)));
    root.push_attribute(("tests", tests.as_str()));
    root.push_attribute(("failures", failures.as_str()));
    root.push_attribute(("time", time.as_str()));
    w.write_event(Event::Start(root)).map_err(xml_err)?;

    for section in &report.sections {
        emit_section(&mut w, section)?;
    }

    w.write_event(Event::End(BytesEnd::new("testsuites")))
        .map_err(xml_err)?;
    w.into_inner().write_all(b"\n").map_err(xml_err)
}

fn emit_section<W: Write>(w: &mut Writer<W>, section: &FileSection) -> Result<()> {
    let tests = section.tests.to_string();
    let failures = section.failures.to_string();
    let time = fmt_time(section.time);
    let mut el = BytesStart::new("testsuite");
    el.push_attribute(("name", &*xml_safe(&section.name)));
    el.push_attribute(("tests", tests.as_str()));
    el.push_attribute(("failures", failures.as_str()));
    el.push_attribute(("time", time.as_str()));

    if section.findings.is_empty() {
        return w.write_event(Event::Empty(el)).map_err(xml_err);
    }
    w.write_event(Event::Start(el)).map_err(xml_err)?;
    for finding in &section.findings {
        emit_finding(w, finding)?;
    }
    w.write_event(Event::End(BytesEnd::new("testsuite")))
        .map_err(xml_err)
}

fn emit_finding<W: Write>(w: &mut Writer<W>, finding: &Finding) -> Result<()> {
    let mut case = BytesStart::new("testcase");
    let check = xml_safe(&finding.check);
    case.push_attribute(("id", &*check));
    case.push_attribute(("name", &*check));
    w.write_event(Event::Start(case)).map_err(xml_err)?;

    let mut failure = BytesStart::new("failure");
    failure.push_attribute(("type", finding.severity.as_str()));
    failure.push_attribute(("message", &*xml_safe(&finding.message)));
    w.write_event(Event::Start(failure)).map_err(xml_err)?;
    w.write_event(Event::Text(BytesText::new(&xml_safe(&finding.body))))
        .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new("failure")))
        .map_err(xml_err)?;

    w.write_event(Event::End(BytesEnd::new("testcase")))
        .map_err(xml_err)
}

//! Run summaries printed by the binary after the document is written.
//!
//! Supports `human` (default) and `json`. The JSON form lists each section's
//! counters plus a top-level summary; findings stay in the XML document.

use crate::models::Report;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print the summary for a finished report in the requested format.
pub fn print_summary(report: &Report, written: &Path, output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_summary_json(report, written)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            for s in &report.sections {
                let name = if s.name.is_empty() { "<global>" } else { s.name.as_str() };
                if s.failures == 0 {
                    if color {
                        println!("{} {}", "✔".green(), name.bright_black());
                    } else {
                        println!("✔ {}", name);
                    }
                } else if color {
                    println!(
                        "{} {} ❲{} failures❳",
                        "✖".red(),
                        name.bold(),
                        s.failures.red()
                    );
                } else {
                    println!("✖ {} ❲{} failures❳", name, s.failures);
                }
            }
            let summary = format!(
                "— Summary — files={} tests={} failures={} time={:.3}s → {}",
                report.sections.len(),
                report.tests,
                report.failures,
                report.time,
                written.to_string_lossy()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose the summary JSON object (pure) for testing/snapshot purposes.
pub fn compose_summary_json(report: &Report, written: &Path) -> JsonVal {
    let sections: Vec<_> = report
        .sections
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "tests": s.tests,
                "failures": s.failures,
                "time": s.time,
            })
        })
        .collect();
    json!({
        "id": report.id,
        "name": report.name,
        "output": written.to_string_lossy(),
        "sections": sections,
        "summary": {
            "files": report.sections.len(),
            "tests": report.tests,
            "failures": report.failures,
            "time": report.time,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileSection, Report};

    #[test]
    fn test_compose_summary_json_shape() {
        let report = Report {
            id: "abc".into(),
            name: "Results".into(),
            tests: 2,
            failures: 2,
            time: 0.5,
            sections: vec![
                FileSection {
                    name: "a.php".into(),
                    tests: 2,
                    failures: 2,
                    time: 0.5,
                    findings: Vec::new(),
                },
                FileSection {
                    name: "b.php".into(),
                    tests: 0,
                    failures: 0,
                    time: 0.0,
                    findings: Vec::new(),
                },
            ],
        };
        let out = compose_summary_json(&report, Path::new("out/style-junit.xml"));
        assert_eq!(out["summary"]["files"], 2);
        assert_eq!(out["summary"]["failures"], 2);
        assert_eq!(out["sections"][1]["name"], "b.php");
        assert_eq!(out["output"], "out/style-junit.xml");
    }
}

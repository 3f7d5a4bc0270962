//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "junit-reporter",
    version,
    about = "Aggregate style-check findings into a JUnit XML report",
    long_about = "junit-reporter replays a recorded stream of per-file findings and writes a single JUnit XML document with test/failure/time totals per file and for the whole run.\n\nConfiguration precedence: CLI > junit-reporter.toml > defaults.",
    after_help = "Examples:\n  junit-reporter report --input findings.json\n  junit-reporter report --input findings.jsonl --out-dir build/reports --check",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current junit-reporter version.")]
    Version,
    /// Build the report from an event stream
    #[command(
        about = "Write a JUnit report",
        long_about = "Replay file/finding events in order and write the JUnit XML document once at the end.",
        after_help = "Event stream entries:\n  {\"event\":\"file\",\"path\":\"./src/a.php\"}\n  {\"event\":\"finding\",\"line\":10,\"check\":\"indentation\",\"message\":\"...\",\"severity\":\"error\"}"
    )]
    Report {
        #[arg(long, help = "Event stream: JSON array, or JSON Lines when the extension is .jsonl")]
        input: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output directory (default: repo root)")]
        out_dir: Option<String>,
        #[arg(long, help = "Output file name (default: style-junit.xml)")]
        file_name: Option<String>,
        #[arg(long, help = "Report title embedded in the root name")]
        title: Option<String>,
        #[arg(long, help = "Summary mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if the report has failures")]
        check: bool,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Debug logging on stderr")]
        verbose: bool,
    },
}

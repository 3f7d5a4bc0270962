//! junit-reporter CLI binary entry point.
//! Resolves config, replays the event stream and prints a summary.

use clap::Parser;
use junit_reporter::cli::{Cli, Commands};
use junit_reporter::utils::{error_prefix, note_prefix};
use junit_reporter::{config, output, replay, ReportAggregator};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Report {
            input,
            repo_root,
            out_dir,
            file_name,
            title,
            output,
            check,
            verbose,
        } => {
            init_tracing(verbose);
            let eff = match config::resolve_effective(&config::Overrides {
                repo_root: repo_root.as_deref(),
                out_dir: out_dir.as_deref(),
                file_name: file_name.as_deref(),
                title: title.as_deref(),
                output: output.as_deref(),
            }) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            if !eff.config_found && eff.output != "json" {
                eprintln!(
                    "{} No junit-reporter.toml found under {}; using defaults.",
                    note_prefix(),
                    eff.repo_root.to_string_lossy()
                );
            }
            let events = match replay::load_events(Path::new(&input)) {
                Ok(events) => events,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            let mut agg = ReportAggregator::new(&eff.reporter);
            let (report, written) = match replay::replay(&mut agg, &events) {
                Ok(done) => done,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            output::print_summary(&report, &written, &eff.output);
            if check && report.failures > 0 {
                std::process::exit(1);
            }
        }
    }
}

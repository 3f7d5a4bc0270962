//! junit-reporter core library.
//!
//! Turns a stream of per-file, per-line findings into one JUnit XML document
//! with running test/failure/time totals at every level.
//!
//! High-level modules:
//! - `aggregator`: Lifecycle state machine (`start`, `begin_file`,
//!   `record_finding`, `stop`) and count/time aggregation.
//! - `section`: Finding composition and the open-section accumulator.
//! - `writer`: JUnit XML serialization and the single terminal write.
//! - `models`: Plain report tree values and the driver event schema.
//! - `clock`: Injectable wall clock.
//! - `config`: Discovery and effective configuration resolution.
//! - `replay`: Event stream loading and replay through the aggregator.
//! - `output`: Human/JSON run summaries.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `error`: Error taxonomy.
//! - `utils`: Supporting helpers.
pub mod aggregator;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod replay;
pub mod section;
pub mod utils;
pub mod writer;

pub use aggregator::ReportAggregator;
pub use error::{ErrorKind, ReportError};
pub use models::{FileSection, Finding, Report, Severity};

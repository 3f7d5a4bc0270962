//! Configuration discovery and effective settings resolution.
//!
//! Reads `junit-reporter.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags. Defaults:
//! - `out_dir`: `.` (relative to the repo root)
//! - `file_name`: `style-junit.xml`
//! - `title`: `Style Check Results`
//! - `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{ReportError, Result};
use crate::writer::DEFAULT_FILE_NAME;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "Style Check Results";

const CONFIG_NAMES: [&str; 3] = [
    "junit-reporter.toml",
    "junit-reporter.yaml",
    "junit-reporter.yml",
];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration file contents.
pub struct FileConfig {
    pub out_dir: Option<String>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// What the aggregator and writer need.
pub struct ReporterConfig {
    pub out_dir: PathBuf,
    pub file_name: String,
    pub title: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            out_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved settings for one binary run.
pub struct Effective {
    pub repo_root: PathBuf,
    pub reporter: ReporterConfig,
    pub output: String,
    pub config_found: bool,
}

/// CLI-side overrides; `None` falls through to the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides<'a> {
    pub repo_root: Option<&'a str>,
    pub out_dir: Option<&'a str>,
    pub file_name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub output: Option<&'a str>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a config file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load the config file under `root`, if one exists.
///
/// A file that exists but does not parse is an error rather than a silent
/// fallback to defaults.
pub fn load_config(root: &Path) -> Result<Option<FileConfig>> {
    for name in CONFIG_NAMES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let raw = fs::read_to_string(&path).map_err(|e| ReportError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<FileConfig>(&raw).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<FileConfig>(&raw).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|message| ReportError::Config { path, message });
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI overrides, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides<'_>) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let out_dir = cli
        .out_dir
        .map(str::to_string)
        .or(cfg.out_dir)
        .unwrap_or_else(|| ".".to_string());
    let out_dir = PathBuf::from(out_dir);
    let out_dir = if out_dir.is_absolute() {
        out_dir
    } else {
        repo_root.join(out_dir)
    };

    let file_name = cli
        .file_name
        .map(str::to_string)
        .or(cfg.file_name)
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    let title = cli
        .title
        .map(str::to_string)
        .or(cfg.title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let output = cli
        .output
        .map(str::to_string)
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Ok(Effective {
        repo_root,
        reporter: ReporterConfig {
            out_dir,
            file_name,
            title,
        },
        output,
        config_found,
    })
}

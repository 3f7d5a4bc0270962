//! Coloured message prefixes for stderr diagnostics.

use owo_colors::OwoColorize;

fn colored() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colored() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colored() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

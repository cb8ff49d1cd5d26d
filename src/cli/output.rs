//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Labelled line (green label) for listings written to `out`
pub fn labelled(label: &str, msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{}: {}", label.green(), msg)
}

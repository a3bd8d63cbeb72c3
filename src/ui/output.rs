//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, output is machine-readable JSON.

use std::fmt::Display;

use serde::Serialize;

use crate::engine::Outcome;
use crate::error::CommandError;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - results only, no warnings
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a command result. Results are shown even in quiet mode.
pub fn result(message: impl Display) {
    println!("{}", message);
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a command error with its category code.
///
/// ```
/// use armada::error::CommandError;
/// use armada::ui::output::format_command_error;
///
/// let err = CommandError::MissingParameters(vec!["name".into()]);
/// assert_eq!(
///     format_command_error(&err),
///     "[missing_parameters] missing required parameter: name"
/// );
/// ```
pub fn format_command_error(err: &CommandError) -> String {
    format!("[{}] {}", err.code(), err)
}

/// Describe an outcome that did not run a handler.
pub fn format_skipped<R>(line: &str, outcome: &Outcome<R>) -> Option<String> {
    outcome
        .reason()
        .map(|reason| format!("{}: {}", line.trim(), reason))
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

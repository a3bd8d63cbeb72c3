//! error
//!
//! Error types for registration and dispatch.
//!
//! # Categories
//!
//! - [`RegistrationError`] - Contract violations found while building a
//!   manager. These are fatal: startup code should not catch and continue.
//! - [`CommandError`] - Per-call input errors raised while binding or
//!   invoking a command. They carry enough detail to show the end user.
//!
//! "Not found" outcomes (unknown prefix, unknown command, no matching
//! overload) are not errors; see [`crate::engine::Outcome`].

use std::fmt;

use thiserror::Error;

use crate::core::param::ConstraintKind;
use crate::core::types::ArgKind;

/// Errors raised while registering gears, commands, transformers or validators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("transformer for kind '{0}' is already registered")]
    DuplicateTransformer(ArgKind),

    #[error("validators for constraint '{0}' are already registered")]
    DuplicateValidator(ConstraintKind),

    #[error("alias '{alias}' already refers to '{existing}', cannot point it at '{requested}'")]
    DuplicateAlias {
        alias: String,
        existing: String,
        requested: String,
    },

    #[error("gear '{0}' is already registered")]
    DuplicateGear(String),

    #[error("command '{command}' has invalid parameters for raw arguments: {reason}")]
    InvalidRawArgs { command: String, reason: String },

    #[error("command '{command}' has invalid parameters: {reason}")]
    InvalidParameters { command: String, reason: String },

    #[error("command '{0}' has no handler")]
    MissingHandler(String),

    #[error("no gear named '{0}' is registered")]
    UnknownGear(String),

    #[error("parameter '{parameter}' of command '{command}' uses constraint '{constraint}' but no validator is registered for it")]
    MissingValidator {
        command: String,
        parameter: String,
        constraint: ConstraintKind,
    },
}

/// A bound value whose kind differs from what the handler asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMismatch {
    pub name: String,
    pub expected: ArgKind,
    pub actual: ArgKind,
}

impl fmt::Display for ParameterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (expected: {}, actual: {})",
            self.name, self.expected, self.actual
        )
    }
}

/// Errors raised while binding arguments to a command or running it.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command '{command}' takes at most {expected} argument{}, but {given} were given", plural(*expected))]
    TooManyArguments {
        command: String,
        expected: usize,
        given: usize,
    },

    #[error("no transformer exists for kind '{kind}' (parameter '{parameter}')")]
    MissingTransformer { parameter: String, kind: ArgKind },

    #[error("parsing failed for argument '{parameter}' of kind {kind}; input: {input}")]
    TransformerParse {
        parameter: String,
        kind: String,
        input: String,
    },

    #[error("invalid value for '{parameter}': {message}")]
    Validation { parameter: String, message: String },

    #[error("missing required parameter{}: {}", plural(.0.len()), .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("invalid types for given parameter{}: {}", plural(.0.len()), join_mismatches(.0))]
    InvalidParameterTypes(Vec<ParameterMismatch>),

    #[error("command failed: {0}")]
    Unknown(anyhow::Error),
}

impl CommandError {
    /// Short machine-friendly label for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::TooManyArguments { .. } => "too_many_arguments",
            CommandError::MissingTransformer { .. } => "missing_transformer",
            CommandError::TransformerParse { .. } => "transformer_parse",
            CommandError::Validation { .. } => "validation",
            CommandError::MissingParameters(_) => "missing_parameters",
            CommandError::InvalidParameterTypes(_) => "invalid_parameter_types",
            CommandError::Unknown(_) => "unknown",
        }
    }

    /// Reclassify a handler error.
    ///
    /// Errors that already are `CommandError`s pass through unchanged;
    /// anything else becomes [`CommandError::Unknown`].
    pub fn from_handler(err: anyhow::Error) -> Self {
        match err.downcast::<CommandError>() {
            Ok(command_error) => command_error,
            Err(other) => CommandError::Unknown(other),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn join_mismatches(mismatches: &[ParameterMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_message() {
        let one = CommandError::MissingParameters(vec!["name".into()]);
        assert_eq!(one.to_string(), "missing required parameter: name");

        let two = CommandError::MissingParameters(vec!["a".into(), "b".into()]);
        assert_eq!(two.to_string(), "missing required parameters: a, b");
    }

    #[test]
    fn mismatch_message_names_both_kinds() {
        let err = CommandError::InvalidParameterTypes(vec![ParameterMismatch {
            name: "times".into(),
            expected: ArgKind::Int,
            actual: ArgKind::Text,
        }]);
        assert_eq!(
            err.to_string(),
            "invalid types for given parameter: times (expected: int, actual: text)"
        );
    }

    #[test]
    fn handler_errors_are_reclassified() {
        let passthrough =
            CommandError::from_handler(CommandError::MissingParameters(vec!["x".into()]).into());
        assert_eq!(passthrough.code(), "missing_parameters");

        let other = CommandError::from_handler(anyhow::anyhow!("disk on fire"));
        assert_eq!(other.code(), "unknown");
        assert_eq!(other.to_string(), "command failed: disk on fire");
    }

    #[test]
    fn too_many_arguments_message() {
        let err = CommandError::TooManyArguments {
            command: "add".into(),
            expected: 1,
            given: 3,
        };
        assert_eq!(
            err.to_string(),
            "command 'add' takes at most 1 argument, but 3 were given"
        );
    }
}

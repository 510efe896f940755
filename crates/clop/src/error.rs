//! Binding errors.
//!
//! Registration mistakes (`DuplicateOptions`, `UnsupportedClause`, ...) and
//! command-line mistakes (`UnknownOption`, `OnceViolation`, ...) share one
//! type, so a single `?` chain covers the whole pass. `Help` and `Version`
//! are not failures: they carry the text the caller asked for.

use std::{fmt, process};

use thiserror::Error;

/// Convenience alias, `E` defaults to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Hint printed after every failure.
pub const TRY_HELP: &str = "For more information try --help";

#[derive(Debug, Error)]
pub enum Error {
    /// A name, env variable, positional name or subcommand is registered twice.
    #[error("error: `{name}` is already in use by `{existing}`")]
    DuplicateOptions { name: String, existing: String },

    #[error("error: unsupported clause `{clause}` in `{tag}`")]
    UnsupportedClause { clause: String, tag: String },

    /// A field declares neither a name nor an env or positional binding.
    #[error("error: no command line option found in `{tag}` (field `{field}`)")]
    NoBindingName { field: String, tag: String },

    #[error("error: illegal option name `{name}`: {reason}")]
    IllegalOptionName { name: String, reason: String },

    /// A short bundle contains a non-ASCII byte.
    #[error("error: illegal character set in `{arg}`, only ASCII short options are supported")]
    IllegalCharacterSet { arg: String },

    #[error(
        "error: Found argument '{arg}' which wasn't expected, or isn't valid in this context{}",
        Suggestion(.suggestion)
    )]
    UnknownOption { arg: String, suggestion: Option<String> },

    #[error("error: Unknown subcommand '{name}'{}", Suggestion(.suggestion))]
    UnknownSubcommand { name: String, suggestion: Option<String> },

    #[error(
        "error: The argument '{arg}' was provided more than once, but cannot be used multiple times"
    )]
    OnceViolation { arg: String },

    #[error("error: The argument '{arg}' requires a value but none was supplied")]
    MissingValue { arg: String },

    #[error("error: empty argument at position {index}")]
    EmptyArgument { index: usize },

    #[error("error: Invalid value '{value}' for '{arg}': {reason}")]
    InvalidValue { arg: String, value: String, reason: String },

    /// `-h`/`--help` was requested, carries the rendered usage.
    #[error("{0}")]
    Help(String),

    /// `-V`/`--version` was requested, carries `<proc> <version>`.
    #[error("{0}")]
    Version(String),
}

struct Suggestion<'a>(&'a Option<String>);

impl fmt::Display for Suggestion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(it) => write!(f, "\n\tDid you mean {it}?"),
            None => Ok(()),
        }
    }
}

impl Error {
    /// Whether the error is an informational response (help or version).
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help(_) | Error::Version(_))
    }

    /// Prints the error and terminates the process.
    ///
    /// Help and version go to stdout with status 0, failures go to stderr
    /// followed by [`TRY_HELP`] with status 1.
    pub fn exit(&self) -> ! {
        if self.is_help() {
            println!("{self}");
            process::exit(0)
        } else {
            eprintln!("{self}");
            eprintln!("{TRY_HELP}");
            process::exit(1)
        }
    }

    pub(crate) fn invalid_value(arg: &str, value: &str, reason: impl fmt::Display) -> Error {
        Error::InvalidValue { arg: arg.to_string(), value: value.to_string(), reason: reason.to_string() }
    }

    pub(crate) fn illegal_name(name: &str, reason: impl fmt::Display) -> Error {
        Error::IllegalOptionName { name: name.to_string(), reason: reason.to_string() }
    }
}

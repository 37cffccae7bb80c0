//! Error types for the action.
//!
//! Tokenizer failures are kept separate from the rest so that callers which
//! only split strings don't have to deal with process or I/O errors.

use std::io;
use thiserror::Error;

/// Malformed quoting or substitution syntax in an input string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// `${}` or a `${name` without its closing brace.
    #[error("Bad substitution: {text}")]
    BadSubstitution { text: String },
    /// An opening quote that is never closed.
    #[error("Unterminated {} quote in arguments", quote_name(.quote))]
    UnterminatedQuote { quote: char },
}

fn quote_name(quote: &char) -> &'static str {
    match quote {
        '\'' => "single",
        _ => "double",
    }
}

/// Everything that can abort a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse the `{name}` input")]
    Input {
        name: String,
        #[source]
        source: TokenizeError,
    },
    #[error("{command}: command not found")]
    NotFound { command: String },
    #[error("failed to execute command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Command exited with status code {code}")]
    ExitStatus { command: String, code: i32 },
    #[error("Command terminated by signal")]
    Signal { command: String },
    #[error("the {name} environment variable must be defined")]
    MissingEnv { name: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_error_messages() {
        let err = TokenizeError::BadSubstitution {
            text: "${}".to_string(),
        };
        assert_eq!(err.to_string(), "Bad substitution: ${}");

        let err = TokenizeError::UnterminatedQuote { quote: '\'' };
        assert_eq!(err.to_string(), "Unterminated single quote in arguments");

        let err = TokenizeError::UnterminatedQuote { quote: '"' };
        assert_eq!(err.to_string(), "Unterminated double quote in arguments");
    }

    #[test]
    fn test_exit_status_message() {
        let err = Error::ExitStatus {
            command: "cmake".to_string(),
            code: 9,
        };
        assert_eq!(err.to_string(), "Command exited with status code 9");
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            command: "ctest".to_string(),
        };
        assert_eq!(err.to_string(), "ctest: command not found");
    }

    #[test]
    fn test_missing_env_message() {
        let err = Error::MissingEnv {
            name: "GITHUB_OUTPUT".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "the GITHUB_OUTPUT environment variable must be defined"
        );
    }
}

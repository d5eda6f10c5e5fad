use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while splitting argument text into tokens.
///
/// Offsets are message offsets in UTF-16 units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("no closing quotation for {quote} opened at offset {offset}")]
    UnclosedQuote { quote: char, offset: usize },

    #[error("no escaped character after backslash at offset {offset}")]
    DanglingEscape { offset: usize },
}

impl TokenizeError {
    /// Same error with its offset moved by `base` units.
    pub fn shifted(self, base: usize) -> Self {
        match self {
            TokenizeError::UnclosedQuote { quote, offset } => TokenizeError::UnclosedQuote {
                quote,
                offset: offset + base,
            },
            TokenizeError::DanglingEscape { offset } => TokenizeError::DanglingEscape {
                offset: offset + base,
            },
        }
    }
}

/// Why the argument parser asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitKind {
    /// Help output was requested.
    Help,
    /// Version output was requested.
    Version,
    /// The arguments did not fit the command's grammar.
    Usage,
}

/// The parser's normal way of reporting bad input or a help request.
///
/// `message` is user-facing text, meant to be sent back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParserExit {
    pub kind: ExitKind,
    pub message: String,
}

impl ParserExit {
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            kind: ExitKind::Usage,
            message: message.into(),
        }
    }
}

/// Errors returned by an argument parser backend.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Exit(#[from] ParserExit),

    #[error("parser internal error: {0}")]
    Internal(String),
}

/// Errors from tokenizing and parsing one command invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The parser requested exit; not a malfunction.
    #[error(transparent)]
    Exit(ParserExit),

    #[error("tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("parser error: {0}")]
    Parser(String),
}

impl From<ParseError> for InvocationError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Exit(exit) => InvocationError::Exit(exit),
            ParseError::Internal(msg) => InvocationError::Parser(msg),
        }
    }
}

impl InvocationError {
    /// Path of the failure kind, as shown to users.
    pub fn kind_name(&self) -> &'static str {
        match self {
            InvocationError::Exit(_) => "ParserExit",
            InvocationError::Tokenize(TokenizeError::UnclosedQuote { .. }) => {
                "TokenizeError::UnclosedQuote"
            }
            InvocationError::Tokenize(TokenizeError::DanglingEscape { .. }) => {
                "TokenizeError::DanglingEscape"
            }
            InvocationError::Parser(_) => "InvocationError::Parser",
        }
    }

    /// `"<kind>: <representation>"` text for an unexpected-failure reply.
    pub fn describe(&self) -> String {
        match self {
            InvocationError::Exit(exit) => format!("{}: {exit:?}", self.kind_name()),
            InvocationError::Tokenize(err) => format!("{}: {err:?}", self.kind_name()),
            InvocationError::Parser(msg) => format!("{}: {msg:?}", self.kind_name()),
        }
    }
}

/// Errors delivering a reply message.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply delivery failed: {0}")]
    Delivery(String),

    #[error("reply channel closed")]
    Closed,
}

/// Errors loading a command configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid command definition: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_error_shift() {
        let err = TokenizeError::UnclosedQuote {
            quote: '"',
            offset: 3,
        };
        assert_eq!(
            err.shifted(5),
            TokenizeError::UnclosedQuote {
                quote: '"',
                offset: 8
            }
        );
    }

    #[test]
    fn test_parser_exit_displays_message_verbatim() {
        let exit = ParserExit::usage("missing argument: user");
        assert_eq!(exit.to_string(), "missing argument: user");
        assert_eq!(exit.kind, ExitKind::Usage);
    }

    #[test]
    fn test_parse_error_converts_to_invocation_error() {
        let err: InvocationError = ParseError::Exit(ParserExit::usage("bad")).into();
        assert!(matches!(err, InvocationError::Exit(_)));

        let err: InvocationError = ParseError::Internal("boom".to_string()).into();
        assert!(matches!(err, InvocationError::Parser(ref m) if m == "boom"));
    }

    #[test]
    fn test_describe_shows_kind_and_representation() {
        let err = InvocationError::from(TokenizeError::DanglingEscape { offset: 9 });
        assert_eq!(
            err.describe(),
            "TokenizeError::DanglingEscape: DanglingEscape { offset: 9 }"
        );

        let err = InvocationError::Parser("boom".to_string());
        assert_eq!(err.describe(), "InvocationError::Parser: \"boom\"");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Parse {
            path: PathBuf::from("commands.toml"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse commands.toml: expected `=`");
    }
}

//! Argument parser boundary.

use botcmd_types::argument::Argument;
use botcmd_types::error::ParseError;
use botcmd_types::namespace::Namespace;

/// A flag/positional argument grammar applied to pre-tokenized arguments.
///
/// `prog` is the command text as it appeared in the message (including any
/// `@username` suffix) and is what usage and help output should show.
/// Bad input and help requests are reported as [`ParseError::Exit`] carrying
/// user-facing text; [`ParseError::Internal`] is reserved for malfunctions.
pub trait ArgParser: Send + Sync {
    fn parse(&self, prog: &str, tokens: &[Argument]) -> Result<Namespace, ParseError>;
}

impl<T: ArgParser + ?Sized> ArgParser for Box<T> {
    fn parse(&self, prog: &str, tokens: &[Argument]) -> Result<Namespace, ParseError> {
        (**self).parse(prog, tokens)
    }
}

impl<T: ArgParser + ?Sized> ArgParser for std::sync::Arc<T> {
    fn parse(&self, prog: &str, tokens: &[Argument]) -> Result<Namespace, ParseError> {
        (**self).parse(prog, tokens)
    }
}

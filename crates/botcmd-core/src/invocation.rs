//! One concrete occurrence of a command in one message.

use std::sync::Arc;

use botcmd_types::argument::Argument;
use botcmd_types::error::{InvocationError, TokenizeError};
use botcmd_types::message::Message;
use botcmd_types::namespace::{ArgValue, Namespace};
use tracing::debug;

use crate::parser::ArgParser;
use crate::tokenizer::{self, Tokenized};

/// A matched command together with its tokens and, once parsed, its
/// namespace.
///
/// Created per message by [`Command::dispatch`](crate::Command::dispatch) and
/// owned by whoever handles that message.
#[derive(Debug, Clone)]
pub struct Invocation {
    prog: String,
    message: Arc<Message>,
    tokens: Vec<Argument>,
    bounds: Vec<usize>,
    args: Option<Namespace>,
}

impl Invocation {
    /// `prog` is the command text exactly as it appears in `message`.
    pub fn new(prog: impl Into<String>, message: Arc<Message>) -> Self {
        Self {
            prog: prog.into(),
            message,
            tokens: Vec::new(),
            bounds: Vec::new(),
            args: None,
        }
    }

    /// Matched command text, including any `@username` suffix.
    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Text of the message the command was found in.
    pub fn text(&self) -> &str {
        &self.message.text
    }

    /// Tokens produced by the last [`tokenize`](Self::tokenize).
    pub fn tokens(&self) -> &[Argument] {
        &self.tokens
    }

    /// Token boundaries produced by the last [`tokenize`](Self::tokenize).
    /// Empty until then.
    pub fn bounds(&self) -> &[usize] {
        &self.bounds
    }

    /// Namespace stored by a successful [`parse_args`](Self::parse_args).
    pub fn args(&self) -> Option<&Namespace> {
        self.args.as_ref()
    }

    /// Split the argument text and store tokens and boundaries.
    pub fn tokenize(&mut self) -> Result<&[Argument], TokenizeError> {
        let Tokenized { tokens, bounds } = tokenizer::tokenize(&self.message, &self.prog)?;
        debug!(prog = %self.prog, tokens = tokens.len(), "tokenized command arguments");
        self.tokens = tokens;
        self.bounds = bounds;
        Ok(&self.tokens)
    }

    /// Tokenize, run `parser` over the tokens and store the namespace.
    ///
    /// # Errors
    ///
    /// [`InvocationError::Exit`] when the parser asks to stop (bad input,
    /// help); other variants for malfunctions.
    pub fn parse_args(&mut self, parser: &dyn ArgParser) -> Result<&Namespace, InvocationError> {
        self.tokenize()?;
        let namespace = parser.parse(&self.prog, &self.tokens)?;
        Ok(self.args.insert(namespace))
    }

    /// Token a parsed value was taken from, with its offsets and entities.
    pub fn source_token(&self, value: &ArgValue) -> Option<&Argument> {
        value.token.and_then(|idx| self.tokens.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcmd_types::config::{ArgKind, ArgSpec, CommandSpec};
    use botcmd_types::entity::{Entity, EntityKind};
    use botcmd_types::error::{ExitKind, ParseError, ParserExit};
    use botcmd_types::namespace::ParsedValue;

    use crate::clap_parser::ClapParser;

    fn ban_parser() -> ClapParser {
        ClapParser::from_spec(&CommandSpec {
            name: "ban".to_string(),
            about: None,
            args: vec![
                ArgSpec {
                    id: "user".to_string(),
                    kind: ArgKind::Positional,
                    long: None,
                    short: None,
                    help: None,
                    required: true,
                    default: None,
                },
                ArgSpec {
                    id: "reason".to_string(),
                    kind: ArgKind::Rest,
                    long: None,
                    short: None,
                    help: None,
                    required: false,
                    default: None,
                },
            ],
        })
        .unwrap()
    }

    /// Collects every token into one `words` value.
    struct Words;

    impl ArgParser for Words {
        fn parse(&self, _prog: &str, tokens: &[Argument]) -> Result<Namespace, ParseError> {
            let mut ns = Namespace::new();
            let values = tokens
                .iter()
                .enumerate()
                .map(|(i, t)| ArgValue::new(t.as_str(), Some(i)))
                .collect();
            ns.insert("words", ParsedValue::Values(values));
            Ok(ns)
        }
    }

    struct AlwaysExit;

    impl ArgParser for AlwaysExit {
        fn parse(&self, _prog: &str, _tokens: &[Argument]) -> Result<Namespace, ParseError> {
            Err(ParserExit::usage("nope").into())
        }
    }

    #[test]
    fn test_new_invocation_is_untokenized() {
        let inv = Invocation::new("/ban", Arc::new(Message::plain("/ban 1")));
        assert_eq!(inv.prog(), "/ban");
        assert_eq!(inv.text(), "/ban 1");
        assert!(inv.tokens().is_empty());
        assert!(inv.bounds().is_empty());
        assert!(inv.args().is_none());
    }

    #[test]
    fn test_parse_args_stores_tokens_bounds_and_namespace() {
        let msg = Message::new(
            r#"/ban@mybot 123 "spam reason""#,
            vec![Entity::bot_command(0, 10)],
        );
        let mut inv = Invocation::new("/ban@mybot", Arc::new(msg));
        let ns = inv.parse_args(&Words).unwrap();
        assert_eq!(ns.many("words").len(), 2);

        assert_eq!(inv.bounds(), &[11, 15, 28]);
        let values: Vec<_> = inv.tokens().iter().map(|t| t.as_str()).collect();
        assert_eq!(values, vec!["123", "spam reason"]);
        assert!(inv.args().is_some());
    }

    #[test]
    fn test_parsed_values_lead_back_to_entities() {
        let mention = Entity::new(5, 8, EntityKind::Mention);
        let msg = Message::new("/ban @spammer flooding", vec![Entity::bot_command(0, 4), mention.clone()]);
        let mut inv = Invocation::new("/ban", Arc::new(msg));
        inv.parse_args(&ban_parser()).unwrap();

        let ns = inv.args().unwrap();
        let user = ns.one("user").unwrap();
        let token = inv.source_token(user).unwrap();
        assert_eq!(token.as_str(), "@spammer");
        assert_eq!(token.entities, vec![mention]);
    }

    #[test]
    fn test_parser_exit_is_kept_distinct() {
        let mut inv = Invocation::new("/ban", Arc::new(Message::plain("/ban")));
        let err = inv.parse_args(&AlwaysExit).unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Exit(ParserExit { kind: ExitKind::Usage, ref message }) if message == "nope"
        ));
        assert!(inv.args().is_none());
        // tokenization still happened
        assert_eq!(inv.bounds(), &[5]);
    }

    #[test]
    fn test_missing_required_argument_is_exit() {
        let mut inv = Invocation::new("/ban", Arc::new(Message::plain("/ban")));
        let err = inv.parse_args(&ban_parser()).unwrap_err();
        assert!(matches!(err, InvocationError::Exit(_)));
    }

    #[test]
    fn test_tokenize_failure_is_not_exit() {
        let mut inv = Invocation::new("/ban", Arc::new(Message::plain("/ban 'oops")));
        let err = inv.parse_args(&Words).unwrap_err();
        assert!(matches!(err, InvocationError::Tokenize(_)));
    }
}

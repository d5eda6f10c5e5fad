//! Command definitions and the per-message dispatch entry point.
//!
//! A [`Command`] is built once at setup and shared read-only by every
//! dispatched message. [`Command::dispatch`] runs synchronously: replies to
//! rejected invocations are spawned on the client's runtime and never awaited.

use std::sync::Arc;

use botcmd_types::config::DispatchConfig;
use botcmd_types::error::InvocationError;
use botcmd_types::message::Message;
use tracing::{debug, info_span};

use crate::event::CommandEvent;
use crate::invocation::Invocation;
use crate::matcher;
use crate::parser::ArgParser;
use crate::reply;

/// Outcome of dispatching one message to one command.
#[derive(Debug)]
pub enum Dispatch {
    /// The command matched and its arguments parsed; run the handler.
    Handled(Invocation),
    /// The command matched but failed; an error reply has been scheduled.
    Rejected,
    /// The message does not open with this command.
    Ignored,
}

impl Dispatch {
    /// Whether the framework should go on to the command's handler.
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled(_))
    }

    pub fn into_invocation(self) -> Option<Invocation> {
        match self {
            Dispatch::Handled(invocation) => Some(invocation),
            _ => None,
        }
    }
}

/// A bot command: its normalized `/name` and argument grammar.
pub struct Command {
    name: String,
    parser: Box<dyn ArgParser>,
    config: DispatchConfig,
}

impl Command {
    /// `name` gets a leading `/` when it lacks one.
    pub fn new(name: &str, parser: impl ArgParser + 'static) -> Self {
        Self {
            name: matcher::normalize_name(name),
            parser: Box::new(parser),
            config: DispatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Normalized name, always starting with `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn parser(&self) -> &dyn ArgParser {
        self.parser.as_ref()
    }

    /// Look for this command at the start of `message`.
    pub fn find(&self, message: &Arc<Message>, username: Option<&str>) -> Option<Invocation> {
        let matched = matcher::find_command(&self.name, message, username)?;
        Some(Invocation::new(matched, Arc::clone(message)))
    }

    /// Match, tokenize and parse one incoming message.
    ///
    /// Parser exits (bad arguments, help) are replied verbatim. Other failures
    /// are replied as `"<kind>: <representation>"` and logged at debug level.
    /// Both return [`Dispatch::Rejected`].
    pub fn dispatch(&self, event: &CommandEvent) -> Dispatch {
        let span = info_span!("command.dispatch", command = %self.name);
        let _enter = span.enter();

        let username = event.client.username();
        let Some(mut invocation) = self.find(&event.message, username.as_deref()) else {
            return Dispatch::Ignored;
        };
        debug!(prog = invocation.prog(), "matched command entity");

        match invocation.parse_args(self.parser.as_ref()) {
            Ok(_) => Dispatch::Handled(invocation),
            Err(InvocationError::Exit(exit)) => {
                debug!(kind = ?exit.kind, "parser requested exit");
                self.spawn_reply(event, exit.message);
                Dispatch::Rejected
            }
            Err(err) => {
                debug!(error = ?err, text = %event.message.text, "error in parsing command");
                self.spawn_reply(event, err.describe());
                Dispatch::Rejected
            }
        }
    }

    fn spawn_reply(&self, event: &CommandEvent, text: String) {
        let replier = Arc::clone(&event.replier);
        let limit = self.config.max_message_length;
        event.client.runtime().spawn(async move {
            // delivery failures are logged inside
            let _ = reply::cut_message_and_send(replier.as_ref(), &text, limit).await;
        });
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

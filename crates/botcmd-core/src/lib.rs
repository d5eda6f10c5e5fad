//! Command matching, argument tokenization and dispatch for botcmd.
//!
//! This crate turns a chat message that opens with a bot command into a
//! parsed [`Invocation`](invocation::Invocation). It depends only on
//! `botcmd-types` plus the argument engine (`clap`) and the async runtime
//! used to schedule replies.

pub mod clap_parser;
pub mod command;
pub mod event;
pub mod invocation;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod reply;
pub mod tokenizer;

pub use clap_parser::ClapParser;
pub use command::{Command, Dispatch};
pub use event::{BotClient, CommandEvent, LocalClient, Replier};
pub use invocation::Invocation;
pub use parser::ArgParser;

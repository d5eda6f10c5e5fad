//! Configuration types for command dispatch.
//!
//! `DispatchConfig` controls how dispatch replies are delivered.
//! `BotcmdConfig` is the TOML file the `botcmd` CLI reads: dispatch settings
//! plus declarative command definitions.

use serde::{Deserialize, Serialize};

/// Message length limit of the chat transport, in UTF-16 units.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4096;

/// Settings shared by every dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Longest reply chunk sent in one message; longer replies are cut.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
        }
    }
}

/// Top-level `botcmd` configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotcmdConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Username the bot runs as, for `/name@username` matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_username: Option<String>,

    /// Declared commands, `[[command]]` in TOML.
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandSpec>,
}

/// Declarative definition of one command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name, with or without the leading `/`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Arguments, `[[command.arg]]` in TOML.
    #[serde(default, rename = "arg")]
    pub args: Vec<ArgSpec>,
}

/// Declarative definition of one command argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub id: String,
    #[serde(default)]
    pub kind: ArgKind,
    /// Long option name; defaults to `id` for non-positional kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// How an argument consumes tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// Bare positional value.
    #[default]
    Positional,
    /// Trailing positional that swallows every remaining token.
    Rest,
    /// `--name value`
    Option,
    /// `--name value`, repeatable.
    Append,
    /// `--name` switch.
    Flag,
    /// `-v -v -v` counter.
    Count,
}

//! CLI command definitions for the `botcmd` binary.
//!
//! Uses clap derive macros for argument parsing. Both working subcommands take
//! the raw message text plus optional `--entity offset:length:kind` entries.

pub mod dispatch;
pub mod tokenize;

use std::path::PathBuf;

use botcmd_types::entity::{Entity, EntityKind};
use botcmd_types::message::Message;
use botcmd_types::utf16;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Inspect how chat messages turn into bot command invocations.
#[derive(Parser)]
#[command(name = "botcmd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all logging except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logging (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a message's arguments into tokens with offsets and entities.
    Tokenize {
        /// Command text the arguments follow (defaults to the first word).
        #[arg(long)]
        command: Option<String>,

        /// Message entity as `offset:length:kind` (UTF-16 units).
        #[arg(long = "entity", value_name = "ENTITY", value_parser = parse_entity)]
        entities: Vec<Entity>,

        /// Full message text, e.g. '/ban 123 "spam reason"'.
        text: String,
    },

    /// Dispatch a message to the commands declared in a config file.
    Dispatch {
        /// TOML file with `[[command]]` definitions.
        #[arg(short, long, env = "BOTCMD_CONFIG")]
        config: PathBuf,

        /// Bot username for `/name@username` matching (overrides the config).
        #[arg(long)]
        bot_username: Option<String>,

        /// Message entity as `offset:length:kind` (UTF-16 units).
        #[arg(long = "entity", value_name = "ENTITY", value_parser = parse_entity)]
        entities: Vec<Entity>,

        /// Full message text.
        text: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse `offset:length:kind`, e.g. `0:4:bot_command` or `5:8:text_link=https://x`.
pub fn parse_entity(s: &str) -> Result<Entity, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(offset), Some(length), Some(kind)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected offset:length:kind, got '{s}'"));
    };
    let offset = offset
        .parse()
        .map_err(|_| format!("invalid entity offset '{offset}'"))?;
    let length = length
        .parse()
        .map_err(|_| format!("invalid entity length '{length}'"))?;
    let kind: EntityKind = kind.parse()?;
    Ok(Entity::new(offset, length, kind))
}

/// Build the message to work on.
///
/// Without explicit entities, a text opening with `/` gets a bot command
/// entity over its first word, the way chat clients mark commands.
pub fn build_message(text: String, entities: Vec<Entity>) -> Message {
    if !entities.is_empty() || !text.starts_with('/') {
        return Message::new(text, entities);
    }
    let length = utf16::len(first_word(&text));
    Message::new(text, vec![Entity::bot_command(0, length)])
}

/// Text up to the first whitespace character.
pub fn first_word(text: &str) -> &str {
    text.split(char::is_whitespace).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_accepts_kinds_with_colons() {
        let entity = parse_entity("5:8:text_link=https://example.org").unwrap();
        assert_eq!(entity.offset, 5);
        assert_eq!(entity.length, 8);
        assert_eq!(
            entity.kind,
            EntityKind::TextLink {
                url: "https://example.org".to_string()
            }
        );
    }

    #[test]
    fn test_parse_entity_rejects_malformed_input() {
        assert!(parse_entity("0:4").is_err());
        assert!(parse_entity("x:4:bold").is_err());
        assert!(parse_entity("0:-1:bold").is_err());
        assert!(parse_entity("0:4:").is_err());
    }

    #[test]
    fn test_build_message_synthesizes_command_entity() {
        let msg = build_message("/ban@mybot 123".to_string(), Vec::new());
        assert_eq!(msg.entities, vec![Entity::bot_command(0, 10)]);

        let msg = build_message("/start".to_string(), Vec::new());
        assert_eq!(msg.entities, vec![Entity::bot_command(0, 6)]);
    }

    #[test]
    fn test_build_message_keeps_explicit_entities() {
        let bold = Entity::new(0, 4, EntityKind::Bold);
        let msg = build_message("/ban 1".to_string(), vec![bold.clone()]);
        assert_eq!(msg.entities, vec![bold]);

        let msg = build_message("hello".to_string(), Vec::new());
        assert!(msg.entities.is_empty());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}

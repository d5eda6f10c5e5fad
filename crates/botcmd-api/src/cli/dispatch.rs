//! `botcmd dispatch` -- run a message through configured commands.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use botcmd_core::{ClapParser, Command, CommandEvent, Dispatch, Invocation, LocalClient, Replier};
use botcmd_types::config::BotcmdConfig;
use botcmd_types::entity::Entity;
use botcmd_types::error::ReplyError;
use botcmd_types::namespace::ParsedValue;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use console::style;
use tokio::sync::mpsc;

use super::build_message;
use super::tokenize::token_table;
use crate::config::load_config;

/// Replier that forwards every reply into a channel.
struct ChannelReplier {
    tx: mpsc::UnboundedSender<String>,
}

impl Replier for ChannelReplier {
    fn send_reply(
        &self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplyError>> + Send + '_>> {
        Box::pin(async move { self.tx.send(text).map_err(|_| ReplyError::Closed) })
    }
}

/// Build every command declared in `config`.
pub fn build_commands(config: &BotcmdConfig) -> Result<Vec<Command>> {
    config
        .commands
        .iter()
        .map(|spec| -> Result<Command> {
            let parser = ClapParser::from_spec(spec)?;
            Ok(Command::new(&spec.name, parser).with_config(config.dispatch.clone()))
        })
        .collect()
}

/// Result of running one message through the configured commands.
pub struct DispatchReport {
    /// Name of the command that matched, if any.
    pub command: Option<String>,
    pub invocation: Option<Invocation>,
    pub replies: Vec<String>,
}

/// Dispatch `text` to each command in order, stopping at the first that is
/// not [`Dispatch::Ignored`], and wait for any replies it scheduled.
pub async fn run_dispatch(
    commands: &[Command],
    username: Option<String>,
    text: String,
    entities: Vec<Entity>,
) -> DispatchReport {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let event = CommandEvent::new(
        build_message(text, entities),
        Arc::new(LocalClient::current(username)),
        Arc::new(ChannelReplier { tx }),
    );

    let mut report = DispatchReport {
        command: None,
        invocation: None,
        replies: Vec::new(),
    };
    for command in commands {
        match command.dispatch(&event) {
            Dispatch::Ignored => continue,
            Dispatch::Handled(invocation) => {
                report.command = Some(command.name().to_string());
                report.invocation = Some(invocation);
            }
            Dispatch::Rejected => report.command = Some(command.name().to_string()),
        }
        break;
    }

    // Reply tasks hold the remaining senders; the channel closes once they finish.
    drop(event);
    while let Some(reply) = rx.recv().await {
        report.replies.push(reply);
    }
    report
}

pub async fn dispatch(
    config_path: &Path,
    bot_username: Option<String>,
    entities: Vec<Entity>,
    text: String,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path).await?;
    let commands = build_commands(&config)
        .with_context(|| format!("invalid commands in {}", config_path.display()))?;
    let username = bot_username.or(config.bot_username.clone());

    let report = run_dispatch(&commands, username, text, entities).await;

    if json {
        let out = serde_json::json!({
            "command": report.command,
            "handled": report.invocation.is_some(),
            "prog": report.invocation.as_ref().map(|inv| inv.prog()),
            "bounds": report.invocation.as_ref().map(|inv| inv.bounds()),
            "tokens": report.invocation.as_ref().map(|inv| inv.tokens()),
            "args": report.invocation.as_ref().and_then(|inv| inv.args()),
            "replies": report.replies,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    match (&report.command, &report.invocation) {
        (None, _) => {
            println!("  {} No configured command matched.", style("∅").dim());
        }
        (Some(_), Some(invocation)) => {
            println!(
                "  {} Handled {}",
                style("✓").green(),
                style(invocation.prog()).cyan()
            );
            if !invocation.tokens().is_empty() {
                println!();
                println!("{}", token_table(invocation.tokens()));
            }
            if let Some(table) = args_table(invocation) {
                println!();
                println!("{table}");
            }
        }
        (Some(name), None) => {
            println!("  {} Rejected {}", style("✗").red(), style(name).cyan());
        }
    }

    for reply in &report.replies {
        println!();
        println!("  {} reply:", style("↩").bold());
        for line in reply.lines() {
            println!("    {line}");
        }
    }
    println!();
    Ok(())
}

fn args_table(invocation: &Invocation) -> Option<Table> {
    let args = invocation.args().filter(|ns| !ns.is_empty())?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Argument", "Value", "Source"]);
    for (id, value) in args.iter() {
        match value {
            ParsedValue::Flag(set) => {
                table.add_row(vec![id.to_string(), set.to_string(), String::new()]);
            }
            ParsedValue::Count(n) => {
                table.add_row(vec![id.to_string(), n.to_string(), String::new()]);
            }
            ParsedValue::Values(values) => {
                for v in values {
                    let source = invocation
                        .source_token(v)
                        .map(|t| format!("{}..={}", t.start, t.end))
                        .unwrap_or_else(|| "default".to_string());
                    table.add_row(vec![id.to_string(), format!("{:?}", v.value), source]);
                }
            }
        }
    }
    Some(table)
}

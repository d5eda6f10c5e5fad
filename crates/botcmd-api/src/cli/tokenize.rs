//! `botcmd tokenize` -- show the tokens, boundaries and entities of a message.

use anyhow::Result;
use botcmd_core::tokenizer::{self, Tokenized};
use botcmd_types::argument::Argument;
use botcmd_types::entity::Entity;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use console::style;

use super::{build_message, first_word};

pub fn tokenize(command: Option<String>, entities: Vec<Entity>, text: String, json: bool) -> Result<()> {
    let message = build_message(text, entities);
    let prog = command.unwrap_or_else(|| first_word(&message.text).to_string());
    let Tokenized { tokens, bounds } = tokenizer::tokenize(&message, &prog)?;

    if json {
        let out = serde_json::json!({
            "prog": prog,
            "bounds": bounds,
            "tokens": tokens,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} token(s) after {}",
        style("✂").bold(),
        tokens.len(),
        style(&prog).cyan()
    );
    println!("  bounds: {bounds:?}");
    println!();

    if tokens.is_empty() {
        println!("  {}", style("No arguments.").dim());
        println!();
        return Ok(());
    }

    println!("{}", token_table(&tokens));
    println!();
    Ok(())
}

pub(crate) fn token_table(tokens: &[Argument]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Value", "Start", "End", "Entities"]);
    for (i, token) in tokens.iter().enumerate() {
        let entities = token
            .entities
            .iter()
            .map(|e| format!("{}@{}+{}", e.kind, e.offset, e.length))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            i.to_string(),
            format!("{:?}", token.value),
            token.start.to_string(),
            token.end.to_string(),
            entities,
        ]);
    }
    table
}

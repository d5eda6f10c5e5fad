//! botcmd CLI entry point.
//!
//! Binary name: `botcmd`
//!
//! Parses CLI arguments, sets up tracing, then runs the requested subcommand.

mod cli;
mod config;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,botcmd_core=debug,botcmd_api=debug",
        _ => "trace",
    };
    botcmd_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    botcmd_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Tokenize {
            command,
            entities,
            text,
        } => cli::tokenize::tokenize(command, entities, text, cli.json)?,

        Commands::Dispatch {
            config,
            bot_username,
            entities,
            text,
        } => cli::dispatch::dispatch(&config, bot_username, entities, text, cli.json).await?,

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "botcmd", &mut std::io::stdout());
        }
    }

    Ok(())
}

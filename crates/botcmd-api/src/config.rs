//! Command configuration loader for the `botcmd` CLI.
//!
//! Reads a TOML file with `[[command]]` definitions and deserializes it into
//! [`BotcmdConfig`]. The `[dispatch]` table and `bot_username` are optional;
//! a file without any command is rejected since there is nothing to dispatch to.

use std::path::Path;

use botcmd_types::config::BotcmdConfig;
use botcmd_types::error::ConfigError;

/// Load and validate the configuration at `path`.
pub async fn load_config(path: &Path) -> Result<BotcmdConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let config = toml::from_str::<BotcmdConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.message().to_string(),
    })?;

    if config.commands.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{} declares no [[command]] entries",
            path.display()
        )));
    }
    if config.dispatch.max_message_length == 0 {
        return Err(ConfigError::Invalid(
            "dispatch.max_message_length must be positive".to_string(),
        ));
    }

    tracing::debug!(
        commands = config.commands.len(),
        "loaded command config from {}",
        path.display()
    );
    Ok(config)
}

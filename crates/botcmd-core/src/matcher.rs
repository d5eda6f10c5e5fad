//! Locating a command at the start of a message.
//!
//! Only a bot command entity at offset 0 counts: commands embedded later in a
//! message are ignored. The entity text must equal the command name exactly
//! (case-sensitive), or `"<name>@<username>"` when the bot's username is known.

use botcmd_types::message::Message;

/// Normalize a configured command name to its `/name` form.
pub fn normalize_name(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// Whether command entity text `text` names `prog` for a bot called `username`.
pub fn matches_command(prog: &str, text: &str, username: Option<&str>) -> bool {
    if text == prog {
        return true;
    }
    username.is_some_and(|username| {
        text.strip_suffix(username)
            .and_then(|rest| rest.strip_suffix('@'))
            .is_some_and(|name| name == prog)
    })
}

/// Find the first offset-0 command entity naming `prog`.
///
/// Returns the entity text as it literally appears, including any
/// `@username` suffix.
pub fn find_command<'m>(
    prog: &str,
    message: &'m Message,
    username: Option<&str>,
) -> Option<&'m str> {
    message
        .entities_text()
        .find(|(entity, text)| {
            entity.is_bot_command() && entity.offset == 0 && matches_command(prog, text, username)
        })
        .map(|(_, text)| text)
}

//! Message entity (rich-text annotation) types.
//!
//! An [`Entity`] tags a sub-range of a message's text: a bot command, a link,
//! bold text and so on. Offsets and lengths are UTF-16 code units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tagged sub-range of message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Start of the range, in UTF-16 code units.
    pub offset: usize,
    /// Length of the range, in UTF-16 code units.
    pub length: usize,
    /// What the range denotes.
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(offset: usize, length: usize, kind: EntityKind) -> Self {
        Self {
            offset,
            length,
            kind,
        }
    }

    /// Shorthand for a bot command entity.
    pub fn bot_command(offset: usize, length: usize) -> Self {
        Self::new(offset, length, EntityKind::BotCommand)
    }

    /// One past the last covered unit (`offset + length`, saturating).
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn is_bot_command(&self) -> bool {
        matches!(self.kind, EntityKind::BotCommand)
    }
}

/// The kind of an entity.
///
/// Only [`EntityKind::BotCommand`] affects command matching; every other kind
/// rides through tokenization attached to the tokens it overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    BotCommand,
    Mention,
    Hashtag,
    Url,
    Email,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Spoiler,
    Code,
    Pre,
    /// Clickable text pointing at a URL.
    TextLink { url: String },
    /// Mention of a user without a username.
    TextMention { user_id: i64 },
    /// Any kind this crate has no dedicated variant for.
    Other { name: String },
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::BotCommand => write!(f, "bot_command"),
            EntityKind::Mention => write!(f, "mention"),
            EntityKind::Hashtag => write!(f, "hashtag"),
            EntityKind::Url => write!(f, "url"),
            EntityKind::Email => write!(f, "email"),
            EntityKind::Bold => write!(f, "bold"),
            EntityKind::Italic => write!(f, "italic"),
            EntityKind::Underline => write!(f, "underline"),
            EntityKind::Strikethrough => write!(f, "strikethrough"),
            EntityKind::Spoiler => write!(f, "spoiler"),
            EntityKind::Code => write!(f, "code"),
            EntityKind::Pre => write!(f, "pre"),
            EntityKind::TextLink { url } => write!(f, "text_link={url}"),
            EntityKind::TextMention { user_id } => write!(f, "text_mention={user_id}"),
            EntityKind::Other { name } => write!(f, "{name}"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Parses the [`Display`](fmt::Display) form back. Unknown names become
    /// [`EntityKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(url) = s.strip_prefix("text_link=") {
            return Ok(EntityKind::TextLink {
                url: url.to_string(),
            });
        }
        if let Some(id) = s.strip_prefix("text_mention=") {
            let user_id = id
                .parse()
                .map_err(|_| format!("invalid user id in '{s}'"))?;
            return Ok(EntityKind::TextMention { user_id });
        }
        let kind = match s {
            "" => return Err("entity kind cannot be empty".to_string()),
            "bot_command" => EntityKind::BotCommand,
            "mention" => EntityKind::Mention,
            "hashtag" => EntityKind::Hashtag,
            "url" => EntityKind::Url,
            "email" => EntityKind::Email,
            "bold" => EntityKind::Bold,
            "italic" => EntityKind::Italic,
            "underline" => EntityKind::Underline,
            "strikethrough" => EntityKind::Strikethrough,
            "spoiler" => EntityKind::Spoiler,
            "code" => EntityKind::Code,
            "pre" => EntityKind::Pre,
            other => EntityKind::Other {
                name: other.to_string(),
            },
        };
        Ok(kind)
    }
}

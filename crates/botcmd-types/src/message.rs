//! Incoming chat message as seen by the command layer.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::utf16;

/// A chat message: its text body and the ordered entity list attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Message {
    pub fn new(text: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            text: text.into(),
            entities,
        }
    }

    /// Message without any entities.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// Pairs each entity with the text it covers, in entity order.
    pub fn entities_text(&self) -> impl Iterator<Item = (&Entity, &str)> + '_ {
        self.entities
            .iter()
            .map(|entity| (entity, utf16::slice(&self.text, entity.offset, entity.length)))
    }

    /// Length of the text body in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        utf16::len(&self.text)
    }
}

//! Command argument token carrying its position in the source message.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// One token produced by tokenizing a command's argument text.
///
/// Dereferences to `str`, so it can be handed to anything that expects the
/// plain token value. `start` and `end` are message offsets in UTF-16 units;
/// `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Token value after quote removal and escape processing.
    pub value: String,
    pub start: usize,
    pub end: usize,
    /// Message entities overlapping `start..=end`, in message order.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Argument {
    pub fn new(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value: value.into(),
            start,
            end,
            entities: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Deref for Argument {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl AsRef<str> for Argument {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

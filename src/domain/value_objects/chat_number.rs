//! Chat number parsed from caller input.

use std::fmt;
use std::str::FromStr;

/// The number of a chat within its application, as supplied by a caller.
///
/// Only the integer format is checked here. Zero and negative values parse
/// fine and simply never match a stored chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatNumber(i64);

/// Returned when the text is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chat number: {0:?}")]
pub struct InvalidChatNumber(pub String);

impl ChatNumber {
    pub fn parse(text: &str) -> Result<Self, InvalidChatNumber> {
        text.parse::<i64>()
            .map(Self)
            .map_err(|_| InvalidChatNumber(text.to_string()))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for ChatNumber {
    type Err = InvalidChatNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

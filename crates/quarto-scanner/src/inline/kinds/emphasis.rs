use serde::{Deserialize, Serialize};

/// The character a delimiter run is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    Star,
    Underscore,
}

impl Delimiter {
    pub const STAR: char = '*';
    pub const UNDERSCORE: char = '_';

    /// Runs longer than this are always literal.
    pub const MAX_RUN: usize = 3;

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            Self::STAR => Some(Delimiter::Star),
            Self::UNDERSCORE => Some(Delimiter::Underscore),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Delimiter::Star => Self::STAR,
            Delimiter::Underscore => Self::UNDERSCORE,
        }
    }

    /// Whether a run of this delimiter with `before` on its left may open.
    ///
    /// Underscores never open inside a word.
    pub fn can_open_after(self, before: Option<char>) -> bool {
        match self {
            Delimiter::Star => true,
            Delimiter::Underscore => !before.is_some_and(char::is_alphanumeric),
        }
    }

    /// Whether a run of this delimiter between `before` and `after` may close.
    pub fn can_close_between(self, before: Option<char>, after: Option<char>) -> bool {
        if before.is_none_or(char::is_whitespace) {
            return false;
        }
        match self {
            Delimiter::Star => true,
            Delimiter::Underscore => !after.is_some_and(char::is_alphanumeric),
        }
    }
}

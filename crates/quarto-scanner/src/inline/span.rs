use serde::{Deserialize, Serialize};

use super::{
    kinds::Delimiter,
    position::{Position, Range},
};

/// What a span turned out to be.
///
/// The discriminants are the persisted `kind` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpanKind {
    /// A run that matched nothing.
    Unmatched = 0,
    /// Delimiters that must be emitted as plain text.
    Literal = 1,
    EmphasisStar = 2,
    EmphasisUnderscore = 3,
    StrongStar = 4,
    StrongUnderscore = 5,
}

impl SpanKind {
    pub const fn emphasis(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Star => SpanKind::EmphasisStar,
            Delimiter::Underscore => SpanKind::EmphasisUnderscore,
        }
    }

    pub const fn strong(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Star => SpanKind::StrongStar,
            Delimiter::Underscore => SpanKind::StrongUnderscore,
        }
    }

    /// The delimiter of an emphasis or strong kind.
    pub const fn delimiter(self) -> Option<Delimiter> {
        match self {
            SpanKind::EmphasisStar | SpanKind::StrongStar => Some(Delimiter::Star),
            SpanKind::EmphasisUnderscore | SpanKind::StrongUnderscore => {
                Some(Delimiter::Underscore)
            }
            SpanKind::Unmatched | SpanKind::Literal => None,
        }
    }

    /// Delimiters covered by each of the span's start and end tokens.
    pub const fn width(self) -> u32 {
        match self {
            SpanKind::EmphasisStar | SpanKind::EmphasisUnderscore => 1,
            SpanKind::StrongStar | SpanKind::StrongUnderscore => 2,
            SpanKind::Unmatched | SpanKind::Literal => 0,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => SpanKind::Unmatched,
            1 => SpanKind::Literal,
            2 => SpanKind::EmphasisStar,
            3 => SpanKind::EmphasisUnderscore,
            4 => SpanKind::StrongStar,
            5 => SpanKind::StrongUnderscore,
            _ => return None,
        })
    }
}

/// A classified range of source text.
///
/// For emphasis and strong the range covers the opening delimiters, the
/// content and the closing delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub range: Range,
    pub kind: SpanKind,
    /// Codepoints covered by `range`.
    pub length: u32,
    pub resolved: bool,
}

impl Span {
    pub fn new(range: Range, kind: SpanKind, length: u32) -> Self {
        Self {
            range,
            kind,
            length,
            resolved: true,
        }
    }

    /// A failed attempt anchored at `at`.
    pub fn unmatched(at: Position) -> Self {
        Self {
            range: Range::new(at, at),
            kind: SpanKind::Unmatched,
            length: 0,
            resolved: false,
        }
    }

    pub fn start(&self) -> Position {
        self.range.start
    }

    pub fn is_markup(&self) -> bool {
        self.resolved && self.kind.delimiter().is_some()
    }

    pub fn is_literal(&self) -> bool {
        self.resolved && self.kind == SpanKind::Literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for code in 0..=5 {
            let kind = SpanKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(SpanKind::from_code(6), None);
    }

    #[test]
    fn strong_is_two_delimiters_wide() {
        assert_eq!(SpanKind::strong(Delimiter::Underscore).width(), 2);
        assert_eq!(SpanKind::emphasis(Delimiter::Star).width(), 1);
        assert_eq!(SpanKind::Literal.width(), 0);
    }

    #[test]
    fn unmatched_is_never_markup() {
        let span = Span::unmatched(Position::new(2, 2));
        assert!(!span.resolved);
        assert!(!span.is_markup());
        assert!(!span.is_literal());
    }
}

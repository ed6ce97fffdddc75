use std::fmt;

use crate::inline::{kinds::Delimiter, span::SpanKind};

/// External tokens the scanner can produce, in the host grammar's order.
///
/// The discriminant is the token's index in the host's valid-token array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    LineEnd,
    EmphasisStarStart,
    EmphasisStarEnd,
    EmphasisUnderscoreStart,
    EmphasisUnderscoreEnd,
    StrongStarStart,
    StrongStarEnd,
    StrongUnderscoreStart,
    StrongUnderscoreEnd,
    /// Delimiters that must be read as text.
    LiteralRun,
    /// Requested by the host only while it recovers from a syntax error.
    Error,
}

impl TokenType {
    pub const COUNT: usize = 11;

    pub const ALL: [TokenType; Self::COUNT] = [
        TokenType::LineEnd,
        TokenType::EmphasisStarStart,
        TokenType::EmphasisStarEnd,
        TokenType::EmphasisUnderscoreStart,
        TokenType::EmphasisUnderscoreEnd,
        TokenType::StrongStarStart,
        TokenType::StrongStarEnd,
        TokenType::StrongUnderscoreStart,
        TokenType::StrongUnderscoreEnd,
        TokenType::LiteralRun,
        TokenType::Error,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The token that opens a span of `kind`.
    pub const fn opening(kind: SpanKind) -> Option<Self> {
        match kind {
            SpanKind::EmphasisStar => Some(TokenType::EmphasisStarStart),
            SpanKind::EmphasisUnderscore => Some(TokenType::EmphasisUnderscoreStart),
            SpanKind::StrongStar => Some(TokenType::StrongStarStart),
            SpanKind::StrongUnderscore => Some(TokenType::StrongUnderscoreStart),
            SpanKind::Unmatched | SpanKind::Literal => None,
        }
    }

    /// The token that closes a span of `kind`.
    pub const fn closing(kind: SpanKind) -> Option<Self> {
        match kind {
            SpanKind::EmphasisStar => Some(TokenType::EmphasisStarEnd),
            SpanKind::EmphasisUnderscore => Some(TokenType::EmphasisUnderscoreEnd),
            SpanKind::StrongStar => Some(TokenType::StrongStarEnd),
            SpanKind::StrongUnderscore => Some(TokenType::StrongUnderscoreEnd),
            SpanKind::Unmatched | SpanKind::Literal => None,
        }
    }

    /// The span kind a start or end token belongs to.
    pub const fn span_kind(self) -> Option<SpanKind> {
        match self {
            TokenType::EmphasisStarStart | TokenType::EmphasisStarEnd => {
                Some(SpanKind::EmphasisStar)
            }
            TokenType::EmphasisUnderscoreStart | TokenType::EmphasisUnderscoreEnd => {
                Some(SpanKind::EmphasisUnderscore)
            }
            TokenType::StrongStarStart | TokenType::StrongStarEnd => Some(SpanKind::StrongStar),
            TokenType::StrongUnderscoreStart | TokenType::StrongUnderscoreEnd => {
                Some(SpanKind::StrongUnderscore)
            }
            TokenType::LiteralRun => Some(SpanKind::Literal),
            TokenType::LineEnd | TokenType::Error => None,
        }
    }

    /// Start tokens of either width for `delimiter`, strong first.
    pub const fn openers(delimiter: Delimiter) -> [TokenType; 2] {
        match delimiter {
            Delimiter::Star => [TokenType::StrongStarStart, TokenType::EmphasisStarStart],
            Delimiter::Underscore => [
                TokenType::StrongUnderscoreStart,
                TokenType::EmphasisUnderscoreStart,
            ],
        }
    }
}

/// The set of tokens the host grammar accepts at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidTokens([bool; TokenType::COUNT]);

impl ValidTokens {
    pub const fn none() -> Self {
        Self([false; TokenType::COUNT])
    }

    /// Every token except [`TokenType::Error`].
    pub fn all() -> Self {
        Self([true; TokenType::COUNT]).without(TokenType::Error)
    }

    /// Reads a host's flag array, indexed by [`TokenType::index`].
    ///
    /// Missing trailing flags count as not requested.
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut set = Self::none();
        for (slot, &flag) in set.0.iter_mut().zip(flags) {
            *slot = flag;
        }
        set
    }

    #[must_use]
    pub fn with(mut self, token: TokenType) -> Self {
        self.0[token.index()] = true;
        self
    }

    #[must_use]
    pub fn without(mut self, token: TokenType) -> Self {
        self.0[token.index()] = false;
        self
    }

    pub fn contains(&self, token: TokenType) -> bool {
        self.0[token.index()]
    }

    pub fn any(&self, tokens: &[TokenType]) -> bool {
        tokens.iter().any(|&t| self.contains(t))
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenType> + '_ {
        TokenType::ALL.into_iter().filter(|&t| self.contains(t))
    }
}

impl FromIterator<TokenType> for ValidTokens {
    fn from_iter<I: IntoIterator<Item = TokenType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// A recognized token: its type and how many codepoints it covers from the
/// position where scanning started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub len: u32,
}

impl Token {
    pub const fn new(kind: TokenType, len: u32) -> Self {
        Self { kind, len }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, token) in TokenType::ALL.iter().enumerate() {
            assert_eq!(token.index(), i);
        }
        assert_eq!(TokenType::LiteralRun.index(), 9);
    }

    #[test]
    fn start_and_end_tokens_map_back_to_their_kind() {
        for kind in [
            SpanKind::EmphasisStar,
            SpanKind::EmphasisUnderscore,
            SpanKind::StrongStar,
            SpanKind::StrongUnderscore,
        ] {
            let open = TokenType::opening(kind).unwrap();
            let close = TokenType::closing(kind).unwrap();
            assert_eq!(open.span_kind(), Some(kind));
            assert_eq!(close.span_kind(), Some(kind));
        }
        assert_eq!(TokenType::opening(SpanKind::Literal), None);
    }

    #[test]
    fn all_leaves_out_error() {
        let valid = ValidTokens::all();
        assert!(!valid.contains(TokenType::Error));
        assert_eq!(valid.iter().count(), TokenType::COUNT - 1);
    }

    #[test]
    fn short_flag_arrays_are_padded() {
        let valid = ValidTokens::from_flags(&[true, false, true]);
        assert_eq!(
            valid.iter().collect::<Vec<_>>(),
            vec![TokenType::LineEnd, TokenType::EmphasisStarEnd]
        );
    }

    #[test]
    fn collects_from_tokens() {
        let valid: ValidTokens = [TokenType::LiteralRun, TokenType::StrongStarStart]
            .into_iter()
            .collect();
        assert!(valid.any(&TokenType::openers(Delimiter::Star)));
        assert!(!valid.any(&TokenType::openers(Delimiter::Underscore)));
    }
}

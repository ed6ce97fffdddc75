//! # Scanner Entry
//!
//! The host calls [`Scanner::scan`] each time its grammar can accept one of
//! the external tokens. The scanner first answers from spans proven on an
//! earlier call; only on a cache miss does it run the
//! [`Resolver`](crate::inline::Resolver) ahead of the host.
//!
//! ## Token lengths
//!
//! A host lexer usually lets the scanner mark where a token ends, so the
//! scanner can peek past it. Here the lookahead is always consumed through
//! the [`CharSource`] as the resolver reads ahead, so the returned
//! [`Token`] carries its length instead: the host resumes at the scan start
//! plus `len`, or at the scan start when no token was produced.

pub mod state;
pub mod tokens;

pub use state::{SERIALIZATION_BUFFER_SIZE, ScannerState};
pub use tokens::{Token, TokenType, ValidTokens};

use crate::{
    inline::{
        cursor::{CharSource, Cursor},
        kinds::Delimiter,
        position::Position,
        resolver::Resolver,
        span::SpanKind,
    },
    options::ScanOptions,
    trace::{Observer, TraceEvent},
};

/// Emphasis and strong scanner for one document.
///
/// `O` receives [`TraceEvent`]s; the default `()` discards them.
#[derive(Debug, Clone, Default)]
pub struct Scanner<O: Observer = ()> {
    options: ScanOptions,
    observer: O,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            observer: (),
        }
    }
}

impl<O: Observer> Scanner<O> {
    pub fn with_observer(options: ScanOptions, observer: O) -> Self {
        Self { options, observer }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Tries to recognize one token at the source's lookahead.
    ///
    /// `state.current_position` must hold the row of the lookahead; the column
    /// is taken from the source. Rows only advance through
    /// [`TokenType::LineEnd`], so a host that asks for line ends whenever it
    /// can sit at a newline keeps the two in step.
    pub fn scan<S: CharSource + ?Sized>(
        &mut self,
        state: &mut ScannerState,
        source: &mut S,
        valid: &ValidTokens,
    ) -> Option<Token> {
        // Error recovery: let the host's own rules resync.
        if valid.contains(TokenType::Error) {
            return None;
        }

        state.current_position.col = source.column();
        let pos = state.current_position;
        let dropped = state.store.prune_before(pos);
        if dropped > 0 {
            self.observer
                .event(TraceEvent::StatePruned { at: pos, dropped });
        }

        let ch = source.lookahead()?;
        let token = self.scan_at(state, source, valid, pos, ch)?;
        state.current_position = match token.kind {
            TokenType::LineEnd => Position::new(pos.row + 1, 0),
            _ => pos.shifted(token.len),
        };
        Some(token)
    }

    fn scan_at<S: CharSource + ?Sized>(
        &mut self,
        state: &mut ScannerState,
        source: &mut S,
        valid: &ValidTokens,
        pos: Position,
        ch: char,
    ) -> Option<Token> {
        if ch == '\n' {
            if !valid.contains(TokenType::LineEnd) {
                return None;
            }
            source.advance(false);
            return Some(Token::new(TokenType::LineEnd, 1));
        }

        if valid.contains(TokenType::LiteralRun)
            && let Some(i) = state.store.find_by_start(pos, SpanKind::Literal)
        {
            let span = state.store.remove(i);
            return Some(self.replay(source, TokenType::LiteralRun, span.length, pos));
        }

        let delimiter = Delimiter::from_char(ch)?;

        // A span this position closes takes precedence over one it opens.
        for kind in [SpanKind::emphasis(delimiter), SpanKind::strong(delimiter)] {
            if let Some(end) = TokenType::closing(kind)
                && valid.contains(end)
                && let Some(i) = state.store.find_by_end(pos.shifted(kind.width()), kind)
            {
                state.store.remove(i);
                return Some(self.replay(source, end, kind.width(), pos));
            }
        }

        for kind in [SpanKind::strong(delimiter), SpanKind::emphasis(delimiter)] {
            if let Some(start) = TokenType::opening(kind)
                && valid.contains(start)
                && state.store.find_by_start(pos, kind).is_some()
            {
                return Some(self.replay(source, start, kind.width(), pos));
            }
        }

        if !valid.any(&TokenType::openers(delimiter)) && !valid.contains(TokenType::LiteralRun) {
            return None;
        }
        // Inside a literal that already started: the host is reading it as text.
        if state.store.find_containing(pos, SpanKind::Literal).is_some() {
            return None;
        }

        let cursor = Cursor::new(source, pos);
        let span = Resolver::new(cursor, &mut state.store, &self.options, &mut self.observer)
            .resolve();

        if span.is_literal() {
            if !valid.contains(TokenType::LiteralRun) {
                return None;
            }
            if let Some(i) = state.store.find_by_start(pos, SpanKind::Literal) {
                state.store.remove(i);
            }
            return Some(Token::new(TokenType::LiteralRun, span.length));
        }

        if span.is_markup() {
            return TokenType::opening(span.kind)
                .filter(|&start| valid.contains(start))
                .map(|start| Token::new(start, span.kind.width()));
        }

        None
    }

    /// Consumes `len` codepoints for a token answered from the store.
    fn replay<S: CharSource + ?Sized>(
        &mut self,
        source: &mut S,
        token: TokenType,
        len: u32,
        at: Position,
    ) -> Token {
        for _ in 0..len {
            source.advance(false);
        }
        self.observer.event(TraceEvent::CacheHit { at, token });
        Token::new(token, len)
    }
}

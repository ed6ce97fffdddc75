//! # Scanning Sessions
//!
//! Drives a [`Scanner`] over a whole document the way a host parser would:
//! ask for every token at each position, fall back to reading one codepoint
//! as text when none is produced, and coalesce consecutive text.
//!
//! A session can be suspended into the persisted state format and resumed
//! later, which is how an incremental host restarts in the middle of a
//! document.

mod source;

pub use source::{DocumentText, TextSource};

use std::fmt;

use xi_rope::Rope;

use crate::{
    inline::position::Position,
    scan::{Scanner, ScannerState, TokenType, ValidTokens},
    trace::Observer,
};

/// One item of a session's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Token {
        kind: TokenType,
        at: Position,
        text: String,
    },
    /// Source the scanner produced no token for.
    Text { at: Position, text: String },
}

impl Emitted {
    pub fn at(&self) -> Position {
        match self {
            Emitted::Token { at, .. } | Emitted::Text { at, .. } => *at,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Emitted::Token { text, .. } | Emitted::Text { text, .. } => text,
        }
    }

    pub fn kind(&self) -> Option<TokenType> {
        match self {
            Emitted::Token { kind, .. } => Some(*kind),
            Emitted::Text { .. } => None,
        }
    }
}

impl fmt::Display for Emitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emitted::Token { kind, at, text } => write!(f, "{at} {kind:?} {text:?}"),
            Emitted::Text { at, text } => write!(f, "{at} Text {text:?}"),
        }
    }
}

/// Steps through one document, one scanner call per item.
///
/// A position where the scanner produces nothing yields a single-codepoint
/// [`Emitted::Text`]; [`coalesce`] merges those runs.
pub struct Session<'s, O: Observer> {
    text: DocumentText,
    at: usize,
    state: ScannerState,
    scanner: &'s mut Scanner<O>,
    valid: ValidTokens,
}

impl<'s, O: Observer> Session<'s, O> {
    pub fn new(rope: &Rope, scanner: &'s mut Scanner<O>) -> Self {
        Self::with_state(DocumentText::from_rope(rope), ScannerState::new(), scanner)
    }

    /// Continues scanning `rope` from a state produced by
    /// [`suspend`](Self::suspend).
    ///
    /// A blob that cannot be read restarts from the beginning of the document.
    pub fn resume(rope: &Rope, persisted: &[u8], scanner: &'s mut Scanner<O>) -> Self {
        Self::with_state(
            DocumentText::from_rope(rope),
            ScannerState::deserialize(persisted),
            scanner,
        )
    }

    fn with_state(text: DocumentText, state: ScannerState, scanner: &'s mut Scanner<O>) -> Self {
        let at = text.offset(state.current_position);
        Self {
            text,
            at,
            state,
            scanner,
            valid: ValidTokens::all(),
        }
    }

    /// Restricts the tokens requested at every position.
    ///
    /// Without [`TokenType::LineEnd`] the scanner cannot follow rows.
    #[must_use]
    pub fn requesting(mut self, valid: ValidTokens) -> Self {
        self.valid = valid;
        self
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Persists the scanner state at the current position.
    pub fn suspend(&self) -> Vec<u8> {
        let mut state = self.state.clone();
        state.current_position = self.text.position(self.at);
        state.serialize()
    }
}

impl<O: Observer> Iterator for Session<'_, O> {
    type Item = Emitted;

    fn next(&mut self) -> Option<Emitted> {
        let start = self.at;
        let ch = self.text.char_at(start)?;
        let mut source = TextSource::new(&self.text, start);
        let at = self.text.position(start);

        match self.scanner.scan(&mut self.state, &mut source, &self.valid) {
            Some(token) => {
                self.at += token.len as usize;
                Some(Emitted::Token {
                    kind: token.kind,
                    at,
                    text: self.text.slice(start, self.at),
                })
            }
            None => {
                self.at += 1;
                Some(Emitted::Text {
                    at,
                    text: ch.to_string(),
                })
            }
        }
    }
}

/// Merges consecutive [`Emitted::Text`] items.
pub fn coalesce(items: impl IntoIterator<Item = Emitted>) -> Vec<Emitted> {
    let mut out: Vec<Emitted> = Vec::new();
    for item in items {
        if let Emitted::Text { text, .. } = &item
            && let Some(Emitted::Text { text: run, .. }) = out.last_mut()
        {
            run.push_str(text);
            continue;
        }
        out.push(item);
    }
    out
}

/// Scans a whole document from the start, coalescing text.
pub fn tokenize<O: Observer>(rope: &Rope, scanner: &mut Scanner<O>) -> Vec<Emitted> {
    coalesce(Session::new(rope, scanner))
}

/// Scans the rest of a document from a persisted state, coalescing text.
pub fn resume<O: Observer>(
    rope: &Rope,
    persisted: &[u8],
    scanner: &mut Scanner<O>,
) -> Vec<Emitted> {
    coalesce(Session::resume(rope, persisted, scanner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ScanOptions;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<Option<TokenType>> {
        let mut scanner = Scanner::new(ScanOptions::default());
        tokenize(&Rope::from(input), &mut scanner)
            .iter()
            .map(Emitted::kind)
            .collect()
    }

    #[test]
    fn plain_text_is_one_item() {
        let mut scanner = Scanner::new(ScanOptions::default());
        let out = tokenize(&Rope::from("just words"), &mut scanner);
        assert_eq!(
            out,
            vec![Emitted::Text {
                at: Position::new(0, 0),
                text: "just words".to_string()
            }]
        );
    }

    #[test]
    fn text_is_split_around_tokens() {
        assert_eq!(
            kinds("a *b* c"),
            vec![
                None,
                Some(TokenType::EmphasisStarStart),
                None,
                Some(TokenType::EmphasisStarEnd),
                None
            ]
        );
    }

    #[test]
    fn every_codepoint_is_emitted_once() {
        let input = "x **y** _z_\n**** `*` é*";
        let mut scanner = Scanner::new(ScanOptions::default());
        let out = tokenize(&Rope::from(input), &mut scanner);
        let joined: String = out.iter().map(Emitted::text).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn suspend_and_resume_continue_the_stream() {
        let rope = Rope::from("**a** and *b*");
        let mut scanner = Scanner::new(ScanOptions::default());
        let whole = tokenize(&rope, &mut scanner);

        // Suspend right after the strong opener has been handed out.
        let mut session = Session::new(&rope, &mut scanner);
        let head: Vec<_> = session.by_ref().take(2).collect();
        let blob = session.suspend();
        drop(session);
        assert_eq!(head[0].kind(), Some(TokenType::StrongStarStart));

        let tail: Vec<_> = Session::resume(&rope, &blob, &mut scanner).collect();
        let rejoined = coalesce(head.into_iter().chain(tail));
        assert_eq!(rejoined, whole);
    }

    #[test]
    fn unreadable_state_restarts_from_the_top() {
        let rope = Rope::from("*a*");
        let mut scanner = Scanner::new(ScanOptions::default());
        let whole = tokenize(&rope, &mut scanner);
        assert_eq!(resume(&rope, &[1, 2, 3], &mut scanner), whole);
    }
}

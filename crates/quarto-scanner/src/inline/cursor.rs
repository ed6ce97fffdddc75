use crate::error::ScanError;

use super::position::{Position, PositionTracker};

/// The host's one-way character stream.
///
/// Mirrors an incremental parser's lexer interface: the host exposes one
/// codepoint of lookahead and can only move forward. Rewinding is the
/// [`Cursor`]'s job.
pub trait CharSource {
    /// The next codepoint, or `None` at end of input.
    fn lookahead(&self) -> Option<char>;

    /// Consumes the lookahead. `skip` marks it as whitespace outside any token.
    fn advance(&mut self, skip: bool);

    /// Column of the lookahead, in codepoints.
    fn column(&self) -> u32;

    /// The codepoint immediately before the lookahead, if the host knows it.
    ///
    /// `None` means line start or unknown; both count as a word boundary.
    fn previous(&self) -> Option<char> {
        None
    }
}

/// A backtrackable cursor over a [`CharSource`].
///
/// Every codepoint pulled from the source is buffered, so the resolver can look
/// arbitrarily far ahead and rewind while the source itself advances at most
/// once per codepoint.
pub struct Cursor<'s, S: CharSource + ?Sized> {
    source: &'s mut S,
    buffer: Vec<char>,
    /// Virtual read offset into `buffer`.
    offset: usize,
    tracker: PositionTracker,
    /// Codepoint before buffer offset 0.
    before: Option<char>,
}

impl<'s, S: CharSource + ?Sized> Cursor<'s, S> {
    /// Creates a cursor whose offset 0 is the source's lookahead at `anchor`.
    pub fn new(source: &'s mut S, anchor: Position) -> Self {
        let before = source.previous();
        Self {
            source,
            buffer: Vec::new(),
            offset: 0,
            tracker: PositionTracker::new(anchor),
            before,
        }
    }

    /// The virtual read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }


    /// The codepoint at the read offset without consuming it.
    pub fn peek(&self) -> Option<char> {
        match self.buffer.get(self.offset) {
            Some(&ch) => Some(ch),
            None => self.source.lookahead(),
        }
    }

    /// Moves past the codepoint at the read offset, returning it.
    ///
    /// The source is only advanced the first time an offset is visited. At end
    /// of input this is a no-op.
    pub fn advance(&mut self, skip: bool) -> Option<char> {
        if self.offset == self.buffer.len() {
            let ch = self.source.lookahead()?;
            if ch == '\n' {
                self.tracker.record_newline(self.offset);
            }
            self.buffer.push(ch);
            self.source.advance(skip);
        }
        let ch = self.buffer[self.offset];
        self.offset += 1;
        Some(ch)
    }

    pub fn bump(&mut self) -> Option<char> {
        self.advance(false)
    }

    /// Advances up to `n` codepoints, stopping early at end of input.
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Consumes consecutive `ch`, returning how many were consumed.
    pub fn eat_while(&mut self, ch: char) -> usize {
        let mut count = 0;
        while self.peek() == Some(ch) {
            self.bump();
            count += 1;
        }
        count
    }

    /// Rewinds the read offset by `n` already-buffered codepoints.
    pub fn backtrack(&mut self, n: usize) -> Result<(), ScanError> {
        if n > self.offset {
            return Err(ScanError::BacktrackUnderflow {
                requested: n,
                available: self.offset,
            });
        }
        self.offset -= n;
        Ok(())
    }

    /// Rewinds to an earlier offset.
    pub fn rewind_to(&mut self, offset: usize) -> Result<(), ScanError> {
        self.backtrack(self.offset.saturating_sub(offset))
    }

    /// The codepoint just before `offset`.
    pub fn char_before(&self, offset: usize) -> Option<char> {
        match offset {
            0 => self.before,
            n => self.buffer.get(n - 1).copied(),
        }
    }

    /// Source position of the read offset.
    pub fn position(&self) -> Position {
        self.tracker.position_at(self.offset)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.tracker.position_at(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts how often the one-way source is advanced.
    struct Counting {
        chars: Vec<char>,
        at: usize,
        pulls: usize,
    }

    impl Counting {
        fn new(s: &str) -> Self {
            Self {
                chars: s.chars().collect(),
                at: 0,
                pulls: 0,
            }
        }
    }

    impl CharSource for Counting {
        fn lookahead(&self) -> Option<char> {
            self.chars.get(self.at).copied()
        }

        fn advance(&mut self, _skip: bool) {
            self.at += 1;
            self.pulls += 1;
        }

        fn column(&self) -> u32 {
            self.at as u32
        }
    }

    #[test]
    fn cursor_basics() {
        let mut src = Counting::new("hello");
        let mut cur = Cursor::new(&mut src, Position::new(0, 10));
        assert_eq!(cur.position(), Position::new(0, 10));
        assert!(cur.peek().is_some());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.position(), Position::new(0, 11));
    }

    #[test]
    fn backtracking_replays_from_the_buffer() {
        let mut src = Counting::new("**ab");
        let mut cur = Cursor::new(&mut src, Position::default());
        assert_eq!(cur.eat_while('*'), 2);
        cur.bump_n(2);
        assert_eq!(cur.peek(), None);
        cur.backtrack(3).unwrap();
        assert_eq!(cur.peek(), Some('*'));
        assert_eq!(cur.offset(), 1);
        cur.bump_n(3);
        assert_eq!(cur.peek(), None);
        drop(cur);
        assert_eq!(src.pulls, 4);
    }

    #[test]
    fn backtrack_past_start_is_a_fault() {
        let mut src = Counting::new("ab");
        let mut cur = Cursor::new(&mut src, Position::default());
        cur.bump();
        assert_eq!(
            cur.backtrack(2),
            Err(ScanError::BacktrackUnderflow {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(cur.offset(), 1);
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut src = Counting::new("x");
        let mut cur = Cursor::new(&mut src, Position::default());
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.offset(), 1);
    }

    #[test]
    fn positions_follow_newlines_after_backtrack() {
        let mut src = Counting::new("a\nbc");
        let mut cur = Cursor::new(&mut src, Position::new(4, 7));
        cur.bump_n(4);
        assert_eq!(cur.position(), Position::new(5, 2));
        cur.rewind_to(1).unwrap();
        assert_eq!(cur.position(), Position::new(4, 8));
        assert_eq!(cur.position_at(2), Position::new(5, 0));
    }

    #[test]
    fn char_before_uses_the_source_at_offset_zero() {
        struct After(Counting);
        impl CharSource for After {
            fn lookahead(&self) -> Option<char> {
                self.0.lookahead()
            }
            fn advance(&mut self, skip: bool) {
                self.0.advance(skip)
            }
            fn column(&self) -> u32 {
                self.0.column()
            }
            fn previous(&self) -> Option<char> {
                Some('o')
            }
        }

        let mut src = After(Counting::new("_b"));
        let mut cur = Cursor::new(&mut src, Position::default());
        assert_eq!(cur.char_before(0), Some('o'));
        cur.bump();
        assert_eq!(cur.char_before(1), Some('_'));
    }
}

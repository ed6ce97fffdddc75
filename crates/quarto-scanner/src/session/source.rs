use xi_rope::Rope;

use crate::inline::{cursor::CharSource, position::Position};

/// A document materialized as codepoints, with line starts for coordinate
/// lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    chars: Vec<char>,
    /// Codepoint offset of the first codepoint of each line.
    line_starts: Vec<usize>,
}

impl DocumentText {
    pub fn from_rope(rope: &Rope) -> Self {
        Self::from(&*rope.slice_to_cow(0..rope.len()))
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    pub fn position(&self, offset: usize) -> Position {
        let row = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position::new(row as u32, (offset - self.line_starts[row]) as u32)
    }

    /// The codepoint offset of `pos`, clamped to its line and the document.
    pub fn offset(&self, pos: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.row as usize) else {
            return self.chars.len();
        };
        let line_end = self
            .line_starts
            .get(pos.row as usize + 1)
            .map_or(self.chars.len(), |&next| next - 1);
        (line_start + pos.col as usize).min(line_end)
    }

    pub fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.chars.len());
        self.chars[from.min(to)..to].iter().collect()
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let line_starts = std::iter::once(0)
            .chain(
                chars
                    .iter()
                    .enumerate()
                    .filter(|(_, ch)| **ch == '\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self { chars, line_starts }
    }
}

/// A one-way [`CharSource`] over a [`DocumentText`].
pub struct TextSource<'t> {
    text: &'t DocumentText,
    at: usize,
}

impl<'t> TextSource<'t> {
    pub fn new(text: &'t DocumentText, at: usize) -> Self {
        Self { text, at }
    }

    /// Offset of the lookahead.
    pub fn offset(&self) -> usize {
        self.at
    }
}

impl CharSource for TextSource<'_> {
    fn lookahead(&self) -> Option<char> {
        self.text.char_at(self.at)
    }

    fn advance(&mut self, _skip: bool) {
        if self.at < self.text.len() {
            self.at += 1;
        }
    }

    fn column(&self) -> u32 {
        self.text.position(self.at).col
    }

    fn previous(&self) -> Option<char> {
        self.at.checked_sub(1).and_then(|i| self.text.char_at(i))
    }
}

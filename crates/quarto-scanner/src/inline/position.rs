use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based source coordinate, ordered by row then column.
///
/// Columns count codepoints, not bytes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The position `n` columns further along the same row.
    #[must_use]
    pub const fn shifted(self, n: u32) -> Self {
        Self {
            row: self.row,
            col: self.col + n,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// A half-open range `[start, end)` of source positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "range start {start} after end {end}");
        Self { start, end }
    }

    /// True if `pos` lies in `[start, end)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// True if `other` lies entirely within `self` (shared edges allowed).
    pub fn covers(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Maps buffer offsets back to source coordinates.
///
/// The tracker is anchored at the position of buffer offset 0 and records the
/// offset just past every buffered newline. Lookups only consider newlines at
/// or before the queried offset, so they stay correct after the cursor
/// backtracks over a line break.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    anchor: Position,
    /// Offsets of the first codepoint of each new line, ascending.
    line_starts: Vec<usize>,
}

impl PositionTracker {
    pub fn new(anchor: Position) -> Self {
        Self {
            anchor,
            line_starts: Vec::new(),
        }
    }

    /// Records that the codepoint buffered at `offset` was a newline.
    pub fn record_newline(&mut self, offset: usize) {
        let next_line = offset + 1;
        debug_assert!(self.line_starts.last().is_none_or(|&last| last < next_line));
        self.line_starts.push(next_line);
    }

    /// Converts a buffer offset into a source position.
    pub fn position_at(&self, offset: usize) -> Position {
        let crossed = self.line_starts.partition_point(|&start| start <= offset);
        match crossed {
            0 => self.anchor.shifted(offset as u32),
            n => Position {
                row: self.anchor.row + n as u32,
                col: (offset - self.line_starts[n - 1]) as u32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_row_then_column() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1).max(Position::new(0, 7)), Position::new(1, 1));
    }

    #[test]
    fn range_contains_is_half_open() {
        let r = Range::new(Position::new(0, 2), Position::new(0, 5));
        assert!(r.contains(Position::new(0, 2)));
        assert!(r.contains(Position::new(0, 4)));
        assert!(!r.contains(Position::new(0, 5)));
        assert!(!r.contains(Position::new(0, 1)));
    }

    #[test]
    fn tracker_without_newlines_offsets_the_anchor_column() {
        let t = PositionTracker::new(Position::new(3, 4));
        assert_eq!(t.position_at(0), Position::new(3, 4));
        assert_eq!(t.position_at(6), Position::new(3, 10));
    }

    #[test]
    fn tracker_resets_column_after_each_newline() {
        // "ab\ncd\nef" anchored at 1:2
        let mut t = PositionTracker::new(Position::new(1, 2));
        t.record_newline(2);
        t.record_newline(5);
        assert_eq!(t.position_at(2), Position::new(1, 4));
        assert_eq!(t.position_at(3), Position::new(2, 0));
        assert_eq!(t.position_at(4), Position::new(2, 1));
        assert_eq!(t.position_at(6), Position::new(3, 0));
        assert_eq!(t.position_at(7), Position::new(3, 1));
    }

    #[test]
    fn tracker_is_stable_for_offsets_before_recorded_newlines() {
        // "a\n\nb": backtracking moves the queried offset behind recorded line breaks
        let mut t = PositionTracker::new(Position::default());
        t.record_newline(1);
        t.record_newline(2);
        assert_eq!(t.position_at(3), Position::new(2, 0));
        assert_eq!(t.position_at(2), Position::new(1, 0));
        assert_eq!(t.position_at(1), Position::new(0, 1));
    }
}

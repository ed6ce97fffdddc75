use thiserror::Error;

use crate::inline::{
    position::{Position, Range},
    span::SpanKind,
    store::Rejected,
};

/// Internal faults that abort a resolution attempt.
///
/// These never reach the host: the scanner traces them and reports no token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("cannot backtrack {requested} codepoints, only {available} buffered")]
    BacktrackUnderflow { requested: usize, available: usize },

    #[error(transparent)]
    Rejected(#[from] Rejected),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("state buffer truncated: need {needed} bytes, found {found}")]
    Truncated { needed: usize, found: usize },

    #[error("unknown span kind code {0}")]
    UnknownKind(u8),

    #[error("span ends at {end} before it starts at {start}")]
    Inverted { start: Position, end: Position },

    /// Zero-length spans, a length that disagrees with the range, or a
    /// resolved flag that disagrees with the kind.
    #[error("span {range} ({kind:?}, length {length}, resolved {resolved}) is malformed")]
    Malformed {
        range: Range,
        kind: SpanKind,
        length: u32,
        resolved: bool,
    },

    #[error("persisted spans are inconsistent: {0}")]
    Inconsistent(#[from] Rejected),
}

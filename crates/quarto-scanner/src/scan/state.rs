//! # Scanner State
//!
//! The state a host keeps between scanner calls and snapshots for
//! incremental re-parsing.
//!
//! ## Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! header  row u32 | col u32 | span_count u32
//! span    start_row u32 | start_col u32 | end_row u32 | end_col u32
//!         | kind u8 | length u32 | resolved u8
//! ```

use crate::{
    error::PersistError,
    inline::{
        position::{Position, Range},
        span::{Span, SpanKind},
        store::IntervalStore,
    },
};

/// Fixed buffer hosts commonly hand to [`ScannerState::serialize_into`].
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

const HEADER_LEN: usize = 12;
const SPAN_LEN: usize = 22;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerState {
    /// Where the host's lookahead was on the last call.
    pub current_position: Position,
    pub store: IntervalStore,
}

impl ScannerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes needed to persist the whole state.
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + self.store.len() * SPAN_LEN
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![0; self.serialized_len()];
        let written = self.serialize_into(&mut out);
        out.truncate(written);
        out
    }

    /// Writes the state into `buf`, returning the bytes written.
    ///
    /// Spans that do not fit whole are left out, latest first. A buffer too
    /// small for the header receives nothing.
    pub fn serialize_into(&self, buf: &mut [u8]) -> usize {
        if buf.len() < HEADER_LEN {
            return 0;
        }
        let count = ((buf.len() - HEADER_LEN) / SPAN_LEN).min(self.store.len());
        if count < self.store.len() {
            log::debug!(
                "state buffer holds {count} of {} spans; dropping the rest",
                self.store.len()
            );
        }

        let mut w = Writer { buf, at: 0 };
        w.u32(self.current_position.row);
        w.u32(self.current_position.col);
        w.u32(count as u32);
        for span in self.store.iter().take(count) {
            w.u32(span.range.start.row);
            w.u32(span.range.start.col);
            w.u32(span.range.end.row);
            w.u32(span.range.end.col);
            w.u8(span.kind.code());
            w.u32(span.length);
            w.u8(u8::from(span.resolved));
        }
        w.at
    }

    /// Restores a state written by [`serialize`](Self::serialize).
    ///
    /// Spans are re-inserted one by one, so a blob whose spans overlap is
    /// rejected rather than trusted.
    pub fn try_deserialize(buf: &[u8]) -> Result<Self, PersistError> {
        let mut r = Reader { buf, at: 0 };
        r.require(HEADER_LEN)?;
        let current_position = Position::new(r.u32(), r.u32());
        let count = r.u32() as usize;
        let needed = count
            .checked_mul(SPAN_LEN)
            .and_then(|n| n.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);
        r.require(needed)?;

        let mut store = IntervalStore::new();
        for _ in 0..count {
            let start = Position::new(r.u32(), r.u32());
            let end = Position::new(r.u32(), r.u32());
            let code = r.u8();
            let kind = SpanKind::from_code(code).ok_or(PersistError::UnknownKind(code))?;
            let length = r.u32();
            let resolved = r.u8() != 0;
            if end < start {
                return Err(PersistError::Inverted { start, end });
            }
            let span = Span {
                range: Range::new(start, end),
                kind,
                length,
                resolved,
            };
            if !well_formed(&span) {
                return Err(PersistError::Malformed {
                    range: span.range,
                    kind,
                    length,
                    resolved,
                });
            }
            store.insert(span)?;
        }

        Ok(Self {
            current_position,
            store,
        })
    }

    /// Like [`try_deserialize`](Self::try_deserialize), falling back to a
    /// fresh state. An empty buffer is the host's way of saying "no state".
    pub fn deserialize(buf: &[u8]) -> Self {
        if buf.is_empty() {
            return Self::default();
        }
        Self::try_deserialize(buf).unwrap_or_else(|e| {
            log::warn!("discarding persisted scanner state: {e}");
            Self::default()
        })
    }
}

/// Every stored span covers at least one codepoint; on a single row its
/// length is its width. Only failed runs are unresolved.
fn well_formed(span: &Span) -> bool {
    let Range { start, end } = span.range;
    span.length > 0
        && span.resolved == (span.kind != SpanKind::Unmatched)
        && (start.row != end.row || span.length == end.col - start.col)
}

struct Writer<'b> {
    buf: &'b mut [u8],
    at: usize,
}

impl Writer<'_> {
    fn u32(&mut self, v: u32) {
        self.buf[self.at..self.at + 4].copy_from_slice(&v.to_le_bytes());
        self.at += 4;
    }

    fn u8(&mut self, v: u8) {
        self.buf[self.at] = v;
        self.at += 1;
    }
}

/// Reads fields after [`require`](Reader::require) has checked the length.
struct Reader<'b> {
    buf: &'b [u8],
    at: usize,
}

impl Reader<'_> {
    fn require(&self, needed: usize) -> Result<(), PersistError> {
        if self.buf.len() < needed {
            return Err(PersistError::Truncated {
                needed,
                found: self.buf.len(),
            });
        }
        Ok(())
    }

    fn u32(&mut self) -> u32 {
        let b = &self.buf[self.at..self.at + 4];
        self.at += 4;
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    fn u8(&mut self) -> u8 {
        let v = self.buf[self.at];
        self.at += 1;
        v
    }
}

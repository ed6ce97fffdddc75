//! # Interval Store
//!
//! Spans the resolver has proven while scanning ahead of the host, ordered by
//! start position. Stored spans never partially overlap: two spans are either
//! disjoint or one strictly contains the other. A parent sorts before the
//! children that share its start.

use thiserror::Error;

use super::{
    position::{Position, Range},
    span::{Span, SpanKind},
};

/// How range `a` relates to range `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a` ends at or before the start of `b`.
    DisjointLess,
    /// Partial overlap, or identical ranges.
    Overlap,
    /// `b` strictly contains `a`.
    Child,
    /// `a` strictly contains `b`.
    Parent,
    /// `a` starts at or after the end of `b`.
    DisjointGreater,
}

pub fn classify(a: &Range, b: &Range) -> Relation {
    if a.end <= b.start {
        Relation::DisjointLess
    } else if a.start >= b.end {
        Relation::DisjointGreater
    } else if a == b {
        Relation::Overlap
    } else if a.covers(b) {
        Relation::Parent
    } else if b.covers(a) {
        Relation::Child
    } else {
        Relation::Overlap
    }
}

/// An insertion that would break the no-overlap invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "span {} ({:?}) overlaps stored span {} ({:?})",
    .span.range, .span.kind, .existing.range, .existing.kind
)]
pub struct Rejected {
    pub span: Span,
    pub existing: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalStore {
    spans: Vec<Span>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Span> {
        self.spans.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.spans
    }

    /// Inserts `span` in start order, returning its index.
    ///
    /// Re-inserting a stored span (same range and kind) returns the existing
    /// index without duplicating it. A resolved span evicts unresolved spans
    /// it partially overlaps; an unresolved one is rejected like any other.
    pub fn insert(&mut self, span: Span) -> Result<usize, Rejected> {
        if span.resolved {
            // A stored failure gives way to any proven span crossing it.
            self.spans
                .retain(|s| s.resolved || classify(&span.range, &s.range) != Relation::Overlap);
        }
        let mut index = self.spans.len();
        for (i, existing) in self.spans.iter().enumerate() {
            match classify(&span.range, &existing.range) {
                Relation::Child | Relation::DisjointGreater => continue,
                Relation::DisjointLess | Relation::Parent => {
                    index = i;
                    break;
                }
                Relation::Overlap
                    if existing.range == span.range && existing.kind == span.kind =>
                {
                    return Ok(i);
                }
                Relation::Overlap => {
                    return Err(Rejected {
                        span,
                        existing: *existing,
                    });
                }
            }
        }

        // Everything after the insertion point that starts inside the new
        // span must nest inside it.
        for existing in &self.spans[index..] {
            if existing.range.start >= span.range.end {
                break;
            }
            if classify(&span.range, &existing.range) != Relation::Parent {
                return Err(Rejected {
                    span,
                    existing: *existing,
                });
            }
        }

        self.spans.insert(index, span);
        Ok(index)
    }

    pub fn remove(&mut self, index: usize) -> Span {
        self.spans.remove(index)
    }

    pub fn find_by_start(&self, pos: Position, kind: SpanKind) -> Option<usize> {
        self.spans
            .iter()
            .position(|s| s.kind == kind && s.range.start == pos)
    }

    /// Finds a span of `kind` whose range ends at `pos`, i.e. whose closing
    /// delimiters finish just before `pos`.
    pub fn find_by_end(&self, pos: Position, kind: SpanKind) -> Option<usize> {
        self.spans
            .iter()
            .position(|s| s.kind == kind && s.range.end == pos)
    }

    pub fn find_containing(&self, pos: Position, kind: SpanKind) -> Option<usize> {
        self.spans
            .iter()
            .position(|s| s.kind == kind && s.range.contains(pos))
    }

    /// The outermost span of any kind starting at `pos`.
    pub fn starting_at(&self, pos: Position) -> Option<&Span> {
        self.spans.iter().find(|s| s.range.start == pos)
    }

    /// Drops spans that end at or before `pos`; the host has moved past them.
    ///
    /// Returns how many were dropped.
    pub fn prune_before(&mut self, pos: Position) -> usize {
        let before = self.spans.len();
        self.spans.retain(|s| s.range.end > pos);
        before - self.spans.len()
    }

    /// Verifies that no two stored spans overlap.
    pub fn check(&self) -> Result<(), Rejected> {
        for (i, a) in self.spans.iter().enumerate() {
            for b in &self.spans[i + 1..] {
                if classify(&a.range, &b.range) == Relation::Overlap {
                    return Err(Rejected {
                        span: *b,
                        existing: *a,
                    });
                }
            }
        }
        Ok(())
    }
}

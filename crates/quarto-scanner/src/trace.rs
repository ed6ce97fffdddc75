//! # Trace Hook
//!
//! Structured events describing every resolution decision. Nothing is printed
//! unless the caller installs an [`Observer`] that wants the events, such as
//! [`LogObserver`].

use crate::{
    error::ScanError,
    inline::{kinds::Delimiter, position::Position, span::Span},
    scan::tokens::TokenType,
};

/// Why a delimiter run was turned into a literal span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoteReason {
    /// More than three delimiters in a row.
    OverlongRun,
    /// An underscore run glued to a word on its left.
    Intraword,
    /// The closing surplus resolved into a competing emphasis.
    AmbiguousClose,
    /// Part of a triple run matched, the rest could not.
    PartialMatch,
}

/// Why a delimiter run matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// The run is followed by whitespace or end of input.
    WhitespaceAfter,
    EndOfInput,
    /// Too many blank lines before a closing run.
    BlankLines,
    DepthLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    CacheHit {
        at: Position,
        token: TokenType,
    },
    RunOpened {
        at: Position,
        delimiter: Delimiter,
        run_len: usize,
    },
    SpanCommitted {
        span: Span,
    },
    RunDemoted {
        at: Position,
        reason: DemoteReason,
    },
    RunAbandoned {
        at: Position,
        reason: AbandonReason,
    },
    /// An internal fault rolled back the whole attempt.
    Fault {
        at: Position,
        error: ScanError,
    },
    StatePruned {
        at: Position,
        dropped: usize,
    },
}

/// Receives trace events from the scanner.
pub trait Observer {
    fn event(&mut self, event: TraceEvent);
}

impl Observer for () {
    fn event(&mut self, _event: TraceEvent) {}
}

impl Observer for Vec<TraceEvent> {
    fn event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn event(&mut self, event: TraceEvent) {
        (**self).event(event);
    }
}

/// Forwards events to the `log` facade under the `quarto_scanner` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn event(&mut self, event: TraceEvent) {
        match &event {
            TraceEvent::Fault { at, error } => {
                log::debug!(target: "quarto_scanner", "attempt at {at} failed: {error}");
            }
            _ => log::trace!(target: "quarto_scanner", "{event:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_observer_collects_in_order() {
        let mut events = Vec::new();
        let at = Position::default();
        events.event(TraceEvent::RunAbandoned {
            at,
            reason: AbandonReason::EndOfInput,
        });
        events.event(TraceEvent::StatePruned { at, dropped: 2 });
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], TraceEvent::StatePruned { dropped: 2, .. }));
    }

    #[test]
    fn observer_through_mutable_reference() {
        fn emit(mut observer: impl Observer) {
            observer.event(TraceEvent::StatePruned {
                at: Position::default(),
                dropped: 0,
            });
        }
        let mut events = Vec::new();
        emit(&mut events);
        assert_eq!(events.len(), 1);
    }
}

//! # Delimiter Resolution
//!
//! Starting at a `*` or `_` run, the resolver reads ahead through the
//! [`Cursor`] until it can prove where the run closes, recursing into every
//! nested run on the way so inner spans are committed first. Every span it
//! proves goes into the [`IntervalStore`], including spans found while an
//! enclosing run later fails: they are valid on their own and become cache
//! hits for the scanner. A run that finds no closer is stored too, as an
//! unresolved span over its opening delimiters, so later passes step over it
//! instead of scanning to the end of the paragraph again.
//!
//! ## Closing precedence
//!
//! | open | closing run | result |
//! |------|-------------|--------|
//! | 1 | any | emphasis; a longer closing run's surplus is resolved as a new run |
//! | 2 | 1 | the single delimiter is resolved as a nested run, scanning goes on |
//! | 2 | ≥2 | strong, surplus left for the enclosing scan |
//! | 3 | 1 | inner emphasis closes, outer continues as strong |
//! | 3 | 2 | inner strong closes, outer continues as emphasis |
//! | 3 | ≥3 | strong containing emphasis, committed together |

use crate::{
    error::ScanError,
    options::ScanOptions,
    trace::{AbandonReason, DemoteReason, Observer, TraceEvent},
};

use super::{
    cursor::{CharSource, Cursor},
    kinds::{CodeSpan, Delimiter, Escape},
    position::{Position, Range},
    span::{Span, SpanKind},
    store::IntervalStore,
};

/// Consecutive line breaks that end a code span.
const CODE_SPAN_LINE_BREAKS: u32 = 2;

pub struct Resolver<'a, S: CharSource + ?Sized, O: Observer> {
    cursor: Cursor<'a, S>,
    store: &'a mut IntervalStore,
    options: &'a ScanOptions,
    observer: &'a mut O,
    depth: u32,
}

impl<'a, S: CharSource + ?Sized, O: Observer> Resolver<'a, S, O> {
    pub fn new(
        cursor: Cursor<'a, S>,
        store: &'a mut IntervalStore,
        options: &'a ScanOptions,
        observer: &'a mut O,
    ) -> Self {
        Self {
            cursor,
            store,
            options,
            observer,
            depth: 0,
        }
    }

    /// Resolves the run at the cursor.
    ///
    /// A fault rolls the store back to its state before the attempt and
    /// yields an unmatched span.
    pub fn resolve(mut self) -> Span {
        let at = self.cursor.position();
        let snapshot = self.store.clone();
        match self.resolve_run() {
            Ok(span) => span,
            Err(error) => {
                *self.store = snapshot;
                self.observer.event(TraceEvent::Fault { at, error });
                Span::unmatched(at)
            }
        }
    }

    /// Resolves one delimiter run, leaving the cursor after whatever the
    /// returned span covers (after the opening run when nothing matched).
    fn resolve_run(&mut self) -> Result<Span, ScanError> {
        let base = self.cursor.offset();
        let start = self.cursor.position_at(base);

        if let Some(cached) = self
            .store
            .starting_at(start)
            .copied()
            .filter(|s| s.length > 0)
        {
            self.cursor.bump_n(cached.length as usize);
            return Ok(cached);
        }

        let Some(delimiter) = self.cursor.peek().and_then(Delimiter::from_char) else {
            self.cursor.bump();
            return Ok(Span::unmatched(start));
        };
        let before = self.cursor.char_before(base);
        let run_len = self.cursor.eat_while(delimiter.as_char());

        if self.depth >= self.options.max_depth {
            return Ok(self.abandon(start, AbandonReason::DepthLimit));
        }

        self.observer.event(TraceEvent::RunOpened {
            at: start,
            delimiter,
            run_len,
        });

        if run_len > Delimiter::MAX_RUN {
            return self.commit_literal(base, run_len, DemoteReason::OverlongRun);
        }
        match self.cursor.peek() {
            None => return Ok(self.abandon(start, AbandonReason::EndOfInput)),
            Some(ch) if ch.is_whitespace() => {
                return Ok(self.abandon(start, AbandonReason::WhitespaceAfter));
            }
            Some(_) => {}
        }
        if !delimiter.can_open_after(before) {
            return self.commit_literal(base, run_len, DemoteReason::Intraword);
        }

        self.depth += 1;
        let result = self.match_run(base, delimiter, run_len);
        self.depth -= 1;
        result
    }

    /// Scans for the closing run of an open run of `run_len` delimiters.
    fn match_run(
        &mut self,
        base: usize,
        delimiter: Delimiter,
        run_len: usize,
    ) -> Result<Span, ScanError> {
        let mut open = run_len;
        let mut line_breaks = 0;

        loop {
            let offset = self.cursor.offset();
            let Some(ch) = self.cursor.peek() else {
                return self.give_up(base, run_len, open, AbandonReason::EndOfInput);
            };

            // Already proven: jump over it. A stored failure may still close
            // this run, so it is only skipped through `resolve_run`.
            if let Some(cached) = self
                .store
                .starting_at(self.cursor.position())
                .copied()
                .filter(|s| s.resolved && s.length > 0)
            {
                self.cursor.bump_n(cached.length as usize);
                line_breaks = 0;
                continue;
            }

            match ch {
                '\n' => {
                    line_breaks += 1;
                    if line_breaks >= self.options.line_break_limit() {
                        return self.give_up(base, run_len, open, AbandonReason::BlankLines);
                    }
                    self.cursor.bump();
                }
                ' ' | '\t' | '\r' => {
                    self.cursor.bump();
                }
                Escape::BACKSLASH => {
                    self.cursor.bump();
                    if self.cursor.peek().is_some_and(|next| next != '\n') {
                        self.cursor.bump();
                    }
                    line_breaks = 0;
                }
                CodeSpan::TICK => {
                    self.skip_code_span()?;
                    line_breaks = 0;
                }
                c if c == delimiter.as_char() => {
                    line_breaks = 0;
                    let before = self.cursor.char_before(offset);
                    let close_len = self.cursor.eat_while(c);
                    let after = self.cursor.peek();

                    if !delimiter.can_close_between(before, after) {
                        self.cursor.rewind_to(offset)?;
                        self.resolve_run()?;
                        continue;
                    }

                    match open {
                        1 => return self.close_emphasis(base, offset, close_len, delimiter),
                        2 if close_len == 1 => {
                            self.cursor.rewind_to(offset)?;
                            self.resolve_run()?;
                        }
                        2 => {
                            self.cursor.rewind_to(offset + 2)?;
                            return self.close(base, offset + 2, SpanKind::strong(delimiter));
                        }
                        _ => match close_len {
                            1 => {
                                let inner = self.span_between(
                                    base + 2,
                                    offset + 1,
                                    SpanKind::emphasis(delimiter),
                                );
                                self.commit(inner)?;
                                open = 2;
                            }
                            2 => {
                                let inner = self.span_between(
                                    base + 1,
                                    offset + 2,
                                    SpanKind::strong(delimiter),
                                );
                                self.commit(inner)?;
                                open = 1;
                            }
                            _ => {
                                self.cursor.rewind_to(offset + 3)?;
                                let inner = self.span_between(
                                    base + 2,
                                    offset + 1,
                                    SpanKind::emphasis(delimiter),
                                );
                                let outer = self.span_between(
                                    base,
                                    offset + 3,
                                    SpanKind::strong(delimiter),
                                );
                                self.commit(inner)?;
                                self.commit(outer)?;
                                return Ok(outer);
                            }
                        },
                    }
                }
                c if Delimiter::from_char(c).is_some() => {
                    self.resolve_run()?;
                    line_breaks = 0;
                }
                _ => {
                    self.cursor.bump();
                    line_breaks = 0;
                }
            }
        }
    }

    /// Closes a single open delimiter at the closing run starting at `close_at`.
    ///
    /// Surplus closing delimiters are tried as a new run. If that run is an
    /// emphasis of the same delimiter the close is ambiguous: whatever the
    /// surplus attempt committed is dropped and the opener becomes literal.
    fn close_emphasis(
        &mut self,
        base: usize,
        close_at: usize,
        close_len: usize,
        delimiter: Delimiter,
    ) -> Result<Span, ScanError> {
        let end = close_at + 1;
        self.cursor.rewind_to(end)?;

        if close_len > 1 {
            let snapshot = self.store.clone();
            let surplus = self.resolve_run()?;
            if surplus.is_markup() && surplus.kind == SpanKind::emphasis(delimiter) {
                *self.store = snapshot;
                return self.commit_literal(base, 1, DemoteReason::AmbiguousClose);
            }
            self.cursor.rewind_to(end)?;
        }

        self.close(base, end, SpanKind::emphasis(delimiter))
    }

    fn close(&mut self, base: usize, end: usize, kind: SpanKind) -> Result<Span, ScanError> {
        let span = self.span_between(base, end, kind);
        self.commit(span)?;
        Ok(span)
    }

    /// Ends a run that found no usable closing delimiter.
    fn give_up(
        &mut self,
        base: usize,
        run_len: usize,
        open: usize,
        reason: AbandonReason,
    ) -> Result<Span, ScanError> {
        if open < run_len {
            // An inner span already took the trailing delimiters.
            return self.commit_literal(base, open, DemoteReason::PartialMatch);
        }
        self.cursor.rewind_to(base + run_len)?;
        self.abandon(self.cursor.position_at(base), reason);
        Ok(self.remember_failure(base, run_len))
    }

    /// Stores the opening run of a failed attempt as an unresolved span.
    ///
    /// The outcome only depends on the text after the run, so any later pass
    /// reaching it can skip the scan. A run already covered by an
    /// overlapping span is left unrecorded.
    fn remember_failure(&mut self, base: usize, run_len: usize) -> Span {
        let span = Span {
            resolved: false,
            ..self.span_between(base, base + run_len, SpanKind::Unmatched)
        };
        match self.store.insert(span) {
            Ok(_) => span,
            Err(_) => Span::unmatched(span.start()),
        }
    }

    fn commit_literal(
        &mut self,
        base: usize,
        len: usize,
        reason: DemoteReason,
    ) -> Result<Span, ScanError> {
        let span = self.span_between(base, base + len, SpanKind::Literal);
        self.observer.event(TraceEvent::RunDemoted {
            at: span.start(),
            reason,
        });
        self.commit(span)?;
        self.cursor.rewind_to(base + len)?;
        Ok(span)
    }

    fn abandon(&mut self, at: Position, reason: AbandonReason) -> Span {
        self.observer.event(TraceEvent::RunAbandoned { at, reason });
        Span::unmatched(at)
    }

    fn commit(&mut self, span: Span) -> Result<(), ScanError> {
        self.store.insert(span)?;
        self.observer.event(TraceEvent::SpanCommitted { span });
        Ok(())
    }

    /// Skips a code span so the delimiters inside it are never matched.
    ///
    /// Backticks without a matching run of the same length are plain text.
    fn skip_code_span(&mut self) -> Result<(), ScanError> {
        let open_at = self.cursor.offset();
        let ticks = self.cursor.eat_while(CodeSpan::TICK);
        let mut line_breaks = 0;

        while let Some(ch) = self.cursor.peek() {
            match ch {
                CodeSpan::TICK => {
                    if self.cursor.eat_while(CodeSpan::TICK) == ticks {
                        return Ok(());
                    }
                    line_breaks = 0;
                }
                '\n' => {
                    line_breaks += 1;
                    if line_breaks >= CODE_SPAN_LINE_BREAKS {
                        break;
                    }
                    self.cursor.bump();
                }
                ' ' | '\t' | '\r' => {
                    self.cursor.bump();
                }
                _ => {
                    self.cursor.bump();
                    line_breaks = 0;
                }
            }
        }

        self.cursor.rewind_to(open_at + ticks)
    }

    fn span_between(&self, from: usize, to: usize, kind: SpanKind) -> Span {
        Span::new(
            Range::new(self.cursor.position_at(from), self.cursor.position_at(to)),
            kind,
            (to - from) as u32,
        )
    }
}

//! # Inline Delimiter Resolution
//!
//! Everything needed to decide, from one position in a one-way character
//! stream, whether a `*` or `_` run opens emphasis, opens strong emphasis or
//! is plain text.
//!
//! ## Architecture
//!
//! - [`cursor`]: buffered, backtrackable view over the host's [`CharSource`]
//! - [`position`]: row/column coordinates and buffer-offset mapping
//! - [`kinds`]: the syntax characters and their flanking rules
//! - [`span`]: classified ranges produced by resolution
//! - [`store`]: ordered, non-overlapping cache of proven spans
//! - [`resolver`]: the recursive matching algorithm
//!
//! ## Flow
//!
//! ```text
//! CharSource → Cursor → Resolver ─commit→ IntervalStore
//!                          ↑                   │
//!                          └──── cache hits ───┘
//! ```
//!
//! The resolver never emits tokens itself. The scanner in [`crate::scan`]
//! consults the store as the host reaches each position.

pub mod cursor;
pub mod kinds;
pub mod position;
pub mod resolver;
pub mod span;
pub mod store;

pub use cursor::{CharSource, Cursor};
pub use kinds::Delimiter;
pub use position::{Position, Range};
pub use resolver::Resolver;
pub use span::{Span, SpanKind};
pub use store::{IntervalStore, Rejected};

//! Emphasis and strong delimiter resolution for an incremental parser of
//! Quarto/Pandoc markdown.
//!
//! The host parser calls [`Scanner::scan`] with the tokens its grammar can
//! accept. Deciding whether `*` or `_` opens emphasis needs lookahead the
//! host cannot give, so the scanner reads ahead, records every span it proves
//! in the [`ScannerState`] and answers later calls from that record.

pub mod error;
pub mod inline;
pub mod options;
pub mod scan;
pub mod session;
pub mod trace;

// Re-export key types for easier usage
pub use error::{PersistError, ScanError};
pub use inline::{CharSource, Delimiter, IntervalStore, Position, Range, Span, SpanKind};
pub use options::ScanOptions;
pub use scan::{SERIALIZATION_BUFFER_SIZE, Scanner, ScannerState, Token, TokenType, ValidTokens};
pub use session::{DocumentText, Emitted, Session, TextSource, coalesce, resume, tokenize};
pub use trace::{LogObserver, Observer, TraceEvent};

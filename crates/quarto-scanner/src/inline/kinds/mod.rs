//! # Inline Kinds
//!
//! Types that own their syntax delimiters. The resolver asks these types
//! whether a codepoint is significant; it never hardcodes `*`, `_` or `` ` ``.
//!
//! - **`Delimiter`**: `*` and `_`, the emphasis/strong run characters
//! - **`CodeSpan`**: `TICK` - raw zone that hides delimiters from matching
//! - **`Escape`**: `BACKSLASH` - makes the next codepoint literal

pub mod code_span;
pub mod emphasis;
pub mod escape;

pub use code_span::CodeSpan;
pub use emphasis::Delimiter;
pub use escape::Escape;

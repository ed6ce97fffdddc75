/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: delimiter runs inside them never open or close.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: char = '`';
}

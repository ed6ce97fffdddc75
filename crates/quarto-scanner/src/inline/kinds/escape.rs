pub struct Escape;

impl Escape {
    /// Forces the following codepoint to be matched as plain text.
    pub const BACKSLASH: char = '\\';
}

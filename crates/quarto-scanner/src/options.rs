use serde::{Deserialize, Serialize};

/// Tunables for delimiter resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Blank lines an open run may span before it is abandoned.
    pub max_blank_lines: u32,
    /// Nested runs deeper than this are left unmatched.
    pub max_depth: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_blank_lines: 1,
            max_depth: 32,
        }
    }
}

impl ScanOptions {
    /// Consecutive line breaks that abort an open run.
    pub(crate) fn line_break_limit(&self) -> u32 {
        self.max_blank_lines + 2
    }
}

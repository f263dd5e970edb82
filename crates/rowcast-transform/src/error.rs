//! Error types for temporal pattern compilation.

use thiserror::Error;

/// Errors raised while compiling a date/time pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    /// Letter with no meaning in a pattern (quote it out of the pattern instead).
    #[error("unsupported letter '{letter}' in pattern '{pattern}'")]
    UnsupportedLetter { pattern: String, letter: char },

    /// A known letter repeated an unsupported number of times, e.g. `yy`.
    #[error("unsupported width {width} for '{letter}' in pattern '{pattern}'")]
    InvalidWidth {
        pattern: String,
        letter: char,
        width: usize,
    },
}

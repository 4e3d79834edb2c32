//! Source positions used to anchor diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A location in the request source (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Anything that can serve as the anchor of an error message.
///
/// Implemented by syntax tokens and by every semantic value derived from
/// them, so a diagnostic can always point back at the text the user wrote.
pub trait HasPosition {
    fn position(&self) -> Position;
}

impl HasPosition for Position {
    fn position(&self) -> Position {
        *self
    }
}

impl<T: HasPosition + ?Sized> HasPosition for &T {
    fn position(&self) -> Position {
        (**self).position()
    }
}

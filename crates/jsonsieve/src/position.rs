use core::fmt;

/// Location of a byte within the logical input stream.
///
/// `offset` counts bytes from the start of the stream, independent of how the
/// byte source chunked its reads. `line` and `column` are one-based; columns
/// count bytes, and every `\n` starts a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Zero-based byte offset.
    pub offset: usize,
    /// One-based line number.
    pub line: usize,
    /// One-based column, in bytes.
    pub column: usize,
}

impl Position {
    /// The position of the first byte of a stream.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Moves past `bytes`, tracking line breaks.
    pub(crate) fn advance(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += bytes.len();
    }

    #[must_use]
    pub(crate) fn advanced(mut self, bytes: &[u8]) -> Self {
        self.advance(bytes);
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (byte {})", self.line, self.column, self.offset)
    }
}

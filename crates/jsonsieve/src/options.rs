/// Bytes requested from the byte source per refill, unless configured.
pub const DEFAULT_READ_SIZE: usize = 8 * 1024;

/// Configuration for a validation run.
///
/// The defaults validate exactly one JSON document with no limits other than
/// available memory.
///
/// # Default
///
/// `read_size` is [`DEFAULT_READ_SIZE`]; the limits are `None`; the boolean is
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SieveOptions {
    /// How many bytes to request from the byte source on each refill.
    ///
    /// Sources may return fewer. A value of zero is treated as one.
    ///
    /// # Default
    ///
    /// [`DEFAULT_READ_SIZE`]
    pub read_size: usize,

    /// Upper bound, in bytes, on a single token that has not been completed
    /// yet.
    ///
    /// The tokenizer keeps an in-flight token buffered in full until its
    /// terminator arrives. A string longer than this limit fails with
    /// [`LexicalErrorKind::BufferLimitExceeded`] instead of growing the buffer
    /// without bound.
    ///
    /// The limit counts the bytes of the token itself, quotes included. A
    /// number is only known to have ended once the following byte arrives,
    /// so that one byte is buffered beyond the limit.
    ///
    /// # Default
    ///
    /// `None`
    ///
    /// [`LexicalErrorKind::BufferLimitExceeded`]: crate::LexicalErrorKind::BufferLimitExceeded
    pub max_buffer_len: Option<usize>,

    /// Upper bound on container nesting.
    ///
    /// # Default
    ///
    /// `None`
    pub max_depth: Option<usize>,

    /// Whether to accept several whitespace-separated top-level values.
    ///
    /// When `true`, a complete value may be followed by another one, as in
    /// JSON Lines or concatenated JSON. When `false`, anything after the first
    /// value is rejected as trailing content.
    ///
    /// # Examples
    ///
    /// ```json
    /// {"a": 1}
    /// {"a": 2}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,
}

impl Default for SieveOptions {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            max_buffer_len: None,
            max_depth: None,
            allow_multiple_values: false,
        }
    }
}

//! Incremental JSON grammar validation over chunked byte streams.
//!
//! A [`Tokenizer`] turns bytes from a [`ByteSource`] into [`Token`]s, and a
//! [`Validator`] checks the token sequence against JSON's grammar with an
//! explicit stack of open containers. No value tree is ever built: memory use
//! is the largest single token plus one byte per nesting level.
//!
//! ```
//! assert!(jsonsieve::validate_slice(br#"{"a": [1, 2, {"b": null}]}"#).is_ok());
//! assert!(jsonsieve::validate_slice(br#"{"a": 1,}"#).is_err());
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod options;
mod position;
mod source;
mod token;
mod tokenizer;
mod validator;

#[cfg(test)]
mod tests;

use core::convert::Infallible;

pub use error::{
    GrammarError, GrammarErrorKind, LexicalError, LexicalErrorKind, NumberError, ValidationError,
};
pub use options::{DEFAULT_READ_SIZE, SieveOptions};
pub use position::Position;
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{ByteSource, ChunkedSource};
pub use token::{Token, TokenKind, TokenSet};
pub use tokenizer::Tokenizer;
pub use validator::{Summary, Validator};

/// Validates everything `source` yields as exactly one JSON document.
///
/// # Errors
///
/// The first lexical or grammar error.
pub fn validate<S: ByteSource>(source: S) -> Result<Summary, ValidationError<S::Error>> {
    validate_with(source, &SieveOptions::default())
}

/// Validates everything `source` yields, configured by `options`.
///
/// Tokens are validated as they are produced, so a grammar error is reported
/// without reading the rest of the stream.
///
/// # Errors
///
/// The first lexical or grammar error.
pub fn validate_with<S: ByteSource>(
    source: S,
    options: &SieveOptions,
) -> Result<Summary, ValidationError<S::Error>> {
    let mut tokenizer = Tokenizer::with_options(source, options);
    let mut validator = Validator::with_options(options);
    while let Some(token) = tokenizer.next_token()? {
        validator.push(&token)?;
    }
    Ok(validator.finish_at(tokenizer.position())?)
}

/// Validates an in-memory document.
///
/// # Errors
///
/// The first lexical or grammar error.
pub fn validate_slice(bytes: &[u8]) -> Result<Summary, ValidationError<Infallible>> {
    validate(bytes)
}

/// Validates everything `reader` yields.
///
/// # Errors
///
/// The first lexical or grammar error; read failures surface as
/// [`LexicalErrorKind::Source`].
#[cfg(feature = "std")]
pub fn validate_reader<R: std::io::Read>(
    reader: R,
    options: &SieveOptions,
) -> Result<Summary, ValidationError<std::io::Error>> {
    validate_with(IoSource::new(reader), options)
}

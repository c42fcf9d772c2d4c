#![expect(missing_docs)]

use std::io::{self, Cursor, Read};

use jsonsieve::{
    IoSource, LexicalErrorKind, SieveOptions, TokenKind, Tokenizer, ValidationError,
    validate_reader,
};

/// Returns at most `step` bytes per read, like a pipe or a socket.
struct Trickle<R> {
    inner: R,
    step: usize,
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.step);
        self.inner.read(&mut buf[..len])
    }
}

/// Yields its bytes, then fails.
struct Broken<'a> {
    data: &'a [u8],
}

impl Read for Broken<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        self.data.read(buf)
    }
}

const DOCUMENT: &str = r#"{
    "name": "jsonsieve",
    "tags": ["json", "stream", "validator"],
    "limits": {"depth": null, "buffer": 8192},
    "ratio": -0.125e-2,
    "enabled": true
}"#;

#[test]
fn validates_a_reader() {
    let summary = validate_reader(Cursor::new(DOCUMENT), &SieveOptions::default()).unwrap();
    assert_eq!(summary.documents, 1);
    assert_eq!(summary.keys, 7);
    assert_eq!(summary.max_depth, 2);
}

#[test]
fn short_reads_match_whole_reads() {
    let whole = validate_reader(Cursor::new(DOCUMENT), &SieveOptions::default()).unwrap();
    for step in [1, 2, 3, 7, 64] {
        let reader = Trickle {
            inner: Cursor::new(DOCUMENT),
            step,
        };
        let trickled = validate_reader(reader, &SieveOptions::default()).unwrap();
        assert_eq!(trickled, whole, "step {step}");
    }
}

#[test]
fn read_errors_surface_as_source_errors() {
    let err = validate_reader(
        Broken {
            data: br#"{"a": [1, 2"#,
        },
        &SieveOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_source_error());
    assert_eq!(err.position().offset, 11);

    let ValidationError::Lexical(err) = err else {
        panic!("expected a lexical error");
    };
    let LexicalErrorKind::Source(io_err) = err.kind else {
        panic!("expected a source error");
    };
    assert_eq!(io_err.kind(), io::ErrorKind::ConnectionReset);
}

#[test]
fn invalid_documents_are_not_source_errors() {
    let err = validate_reader(Cursor::new("[1,]"), &SieveOptions::default()).unwrap_err();
    assert!(!err.is_source_error());
    assert!(matches!(err, ValidationError::Grammar(_)));
}

#[test]
fn tokenizer_over_io_source() {
    let tokenizer = Tokenizer::new(IoSource::new(Cursor::new(r#"[1, "two"]"#)));
    let kinds: Vec<_> = tokenizer.map(|t| t.unwrap().kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::ArrayStart,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::ArrayEnd,
        ]
    );
}

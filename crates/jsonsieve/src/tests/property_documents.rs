use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};

use super::arbitrary::{Document, test_count};
use crate::{ChunkedSource, SieveOptions, validate, validate_slice, validate_with};

/// Property: every document `serde_json` renders is accepted, compact or
/// pretty-printed.
#[test]
fn rendered_documents_are_accepted() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let compact = validate_slice(&doc.compact());
        let pretty = validate_slice(&doc.pretty());
        match (compact, pretty) {
            (Ok(a), Ok(b)) => a == b && a.documents == 1,
            _ => false,
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document) -> bool);
}

/// Property: the outcome does not depend on how the stream is split into
/// reads.
#[test]
fn chunking_does_not_change_the_summary() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, chunk: usize) -> bool {
        let bytes = doc.pretty();
        let chunk = 1 + chunk % 16;
        validate(ChunkedSource::new(&bytes, chunk)) == validate_slice(&bytes)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document, usize) -> bool);
}

/// Property: concatenated documents are counted one by one when multiple
/// values are allowed, and rejected otherwise.
#[test]
fn concatenated_documents() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(docs: Vec<Document>) -> TestResult {
        if docs.len() < 2 {
            return TestResult::discard();
        }
        let mut bytes = Vec::new();
        for doc in &docs {
            bytes.extend_from_slice(&doc.compact());
            bytes.push(b'\n');
        }

        let options = SieveOptions {
            allow_multiple_values: true,
            ..SieveOptions::default()
        };
        let counted = validate_with(&bytes[..], &options).map(|s| s.documents);
        TestResult::from_bool(counted == Ok(docs.len()) && validate_slice(&bytes).is_err())
    }

    QuickCheck::new()
        .tests(test_count() / 10)
        .quickcheck(prop as fn(Vec<Document>) -> TestResult);
}

/// Property: the validator sees exactly the tokens the tokenizer produces.
#[quickcheck_macros::quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn token_counts_agree(doc: Document) -> bool {
    let bytes = doc.compact();
    let tokens = crate::Tokenizer::new(&bytes[..]).count();
    validate_slice(&bytes).map(|s| s.tokens) == Ok(tokens)
}

use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

/// A well-formed JSON document, rendered through `serde_json`.
#[derive(Debug, Clone)]
pub(crate) struct Document(pub Value);

impl Document {
    pub(crate) fn compact(&self) -> Vec<u8> {
        serde_json::to_vec(&self.0).unwrap()
    }

    pub(crate) fn pretty(&self) -> Vec<u8> {
        serde_json::to_vec_pretty(&self.0).unwrap()
    }
}

fn number(g: &mut Gen) -> Number {
    if bool::arbitrary(g) {
        return Number::from(i64::arbitrary(g));
    }
    loop {
        if let Some(n) = Number::from_f64(f64::arbitrary(g)) {
            return n;
        }
    }
}

fn value(g: &mut Gen, depth: usize) -> Value {
    let choices = if depth == 0 { 4 } else { 6 };
    match usize::arbitrary(g) % choices {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Number(number(g)),
        3 => Value::String(String::arbitrary(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for Document {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Self(value(g, depth))
    }
}

/// Bytes drawn from the characters JSON text is made of, so that random input
/// reaches deep into the tokenizer and the grammar instead of failing on the
/// first byte.
#[derive(Debug, Clone)]
pub(crate) struct JsonishBytes(pub Vec<u8>);

const ALPHABET: &[u8] = b"{}[]:,\"\\ \n-+.0123456789eEtrufalsn";

impl Arbitrary for JsonishBytes {
    fn arbitrary(g: &mut Gen) -> Self {
        let bytes: Vec<u8> = Vec::arbitrary(g);
        Self(
            bytes
                .into_iter()
                .map(|b| ALPHABET[usize::from(b) % ALPHABET.len()])
                .collect(),
        )
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        alloc::boxed::Box::new(self.0.shrink().map(JsonishBytes))
    }
}

pub(crate) fn test_count() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

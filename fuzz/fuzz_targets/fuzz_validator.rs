#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use jsonsieve::{ChunkedSource, SieveOptions, validate_slice, validate_with};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Number, Value};

/// Flag byte, then a 4-byte seed for read sizes.
const HEADER: usize = 5;

const WHITESPACE: &[u8] = b" \t\n\r";

/// Shape of a generated document, turned into a `serde_json::Value` so that
/// rendering (escapes, number formatting) is serde_json's.
#[derive(Debug, Arbitrary)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    fn into_value(self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::Int(n) => Value::Number(n.into()),
            Node::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Node::Str(s) => Value::String(s),
            Node::Array(items) => Value::Array(items.into_iter().map(Node::into_value).collect()),
            Node::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

/// Every tenth call replaces the input with whitespace-separated documents
/// built from random bytes, so runs regularly reach deep into the grammar;
/// the rest are plain byte mutations.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if (size >= HEADER && !seed.is_multiple_of(10)) || max_size <= HEADER {
        return fuzzer_mutate(data, size, max_size);
    }

    let mut rng = SmallRng::seed_from_u64(u64::from(seed));
    data[0] = rng.random::<u8>() & 0x07;
    data[1..HEADER].copy_from_slice(&rng.random::<u32>().to_le_bytes());

    let mut out = Vec::new();
    let documents = if data[0] & 1 == 0 { 1 } else { rng.random_range(1..=4) };
    for _ in 0..documents {
        let raw: Vec<u8> = (0..rng.random_range(0..=size.max(16) * 2))
            .map(|_| rng.random())
            .collect();
        let Ok(node) = Node::arbitrary(&mut Unstructured::new(&raw)) else {
            continue;
        };
        for _ in 0..rng.random_range(0..3) {
            out.push(WHITESPACE[rng.random_range(0..WHITESPACE.len())]);
        }
        out.extend(serde_json::to_vec(&node.into_value()).unwrap_or_default());
        out.push(b'\n');
    }

    let len = out.len().min(max_size - HEADER);
    data[HEADER..HEADER + len].copy_from_slice(&out[..len]);
    HEADER + len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn check(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let seed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as usize;
    let data = &data[HEADER..];

    let options = SieveOptions {
        allow_multiple_values: flags & 1 != 0,
        max_depth: (flags & 2 != 0).then_some(64),
        read_size: 1 + seed % 64,
        ..SieveOptions::default()
    };

    // Read boundaries never change the outcome.
    let whole = validate_with(data, &options);
    let chunk = 1 + (seed >> 8) % 32;
    let chunked = validate_with(ChunkedSource::new(data, chunk), &options);
    assert_eq!(whole, chunked);

    // Whatever serde_json accepts as a single document is accepted here.
    if flags & 4 != 0 && serde_json::from_slice::<Value>(data).is_ok() {
        assert!(validate_slice(data).is_ok(), "{:?}", String::from_utf8_lossy(data));
    }
}

fuzz_target!(|data: &[u8]| check(data));

//! Byte sources feeding the tokenizer.
//!
//! A [`ByteSource`] hands out bytes on demand. Reads may be short; a read of
//! zero bytes marks the end of the stream. Errors are passed through to the
//! caller untouched, so cancellation and deadlines belong to the source.

use core::{cmp, convert::Infallible};

/// A sequential provider of bytes.
pub trait ByteSource {
    /// Error surfaced by a failed read.
    type Error;

    /// Reads up to `buf.len()` bytes into `buf` and returns how many were
    /// written. `Ok(0)` means the stream has ended.
    ///
    /// # Errors
    ///
    /// Whatever the underlying source reports. The tokenizer never retries.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    type Error = S::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

impl ByteSource for &[u8] {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = cmp::min(buf.len(), self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// Serves a byte slice at most `chunk` bytes per read.
///
/// With `chunk == 1` every token straddles a read boundary, which makes this
/// the quickest way to check that results do not depend on how input arrives.
#[derive(Debug, Clone)]
pub struct ChunkedSource<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedSource<'a> {
    /// Creates a source over `data`. A `chunk` of zero is treated as one.
    #[must_use]
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk: chunk.max(1),
        }
    }
}

impl ByteSource for ChunkedSource<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let limit = cmp::min(buf.len(), self.chunk);
        self.data.read(&mut buf[..limit])
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self(reader)
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.0
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn drain<S: ByteSource<Error = Infallible>>(mut source: S, size: usize) -> Vec<Vec<u8>> {
        let mut reads = Vec::new();
        let mut buf = alloc::vec![0; size];
        loop {
            let Ok(n) = source.read(&mut buf);
            if n == 0 {
                return reads;
            }
            reads.push(buf[..n].to_vec());
        }
    }

    #[test]
    fn slice_source_fills_request() {
        let reads = drain(&b"[1, 2]"[..], 4);
        assert_eq!(reads, [b"[1, ".to_vec(), b"2]".to_vec()]);
    }

    #[test]
    fn chunked_source_reads_short() {
        let reads = drain(ChunkedSource::new(b"true", 3), 16);
        assert_eq!(reads, [b"tru".to_vec(), b"e".to_vec()]);
    }

    #[test]
    fn chunked_source_zero_chunk_is_one() {
        let reads = drain(ChunkedSource::new(b"[]", 0), 16);
        assert_eq!(reads, [b"[".to_vec(), b"]".to_vec()]);
    }
}

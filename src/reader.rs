//!
//! The abstract byte source consumed by every parser, plus the two stock
//! implementations.
//!

use std::io;

use crate::errors::{ParseError, ParseResult};

///
/// A forward-only byte source.
///
/// The parsers in this crate never block: whenever a reader cannot provide
/// data *right now*, parsing is suspended by returning
/// [`FeedStatus::Partial`](crate::FeedStatus) to the caller, who re-invokes
/// `feed` once more input is available.  To make that work, `Reader`
/// implementations must follow two rules:
///
/// - Returning fewer bytes than requested - including zero - is a legal,
///   expected outcome, not an error.  `Ok(0)` means "no data available at
///   the moment, try again later."
/// - A true end of stream is reported as [`ParseError::EndOfFile`].
///
/// A reader is not owned by any parser; it outlives individual parse calls
/// and is shared across all elements of one stream.
///
pub trait Reader {
    ///
    /// Reads up to `buf.len()` bytes into `buf`, returning how many were
    /// read.
    ///
    fn read(&mut self, buf: &mut [u8]) -> ParseResult<usize>;

    ///
    /// Discards up to `num_to_skip` bytes, returning how many were skipped.
    /// `Ok(0)` has the same "try again later" meaning as for [`read`].
    ///
    /// [`read`]: Reader::read
    ///
    fn skip(&mut self, num_to_skip: u64) -> ParseResult<u64>;

    ///
    /// The absolute position of the next byte, counted from the start of the
    /// stream.
    ///
    fn position(&self) -> u64;
}

///
/// A [`Reader`] over a complete in-memory buffer.
///
/// Once the buffer is exhausted every call reports
/// [`ParseError::EndOfFile`].
///
pub struct BufferReader {
    data: Vec<u8>,
    pos: usize,
}

impl BufferReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        BufferReader {
            data: data.into(),
            pos: 0,
        }
    }
}

impl Reader for BufferReader {
    fn read(&mut self, buf: &mut [u8]) -> ParseResult<usize> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        let count = buf.len().min(self.data.len() - self.pos);
        buf[..count].copy_from_slice(&self.data[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }

    fn skip(&mut self, num_to_skip: u64) -> ParseResult<u64> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        let count = num_to_skip.min((self.data.len() - self.pos) as u64);
        self.pos += count as usize;
        Ok(count)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

///
/// Adapts any blocking [`std::io::Read`] source into a [`Reader`].
///
/// `ErrorKind::WouldBlock` is translated into the non-blocking "no data
/// yet" outcome (`Ok(0)`) and `ErrorKind::Interrupted` is retried, so this
/// adapter also behaves sensibly over sockets placed in non-blocking mode.
///
pub struct IoReader<R: io::Read> {
    source: R,
    position: u64,
}

impl<R: io::Read> IoReader<R> {
    pub fn new(source: R) -> Self {
        IoReader {
            source,
            position: 0,
        }
    }

    /// Consumes the adapter, returning the wrapped source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: io::Read> Reader for IoReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> ParseResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.source.read(buf) {
                Ok(0) => return Err(ParseError::EndOfFile),
                Ok(count) => {
                    self.position += count as u64;
                    return Ok(count);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(0),
                Err(err) => return Err(ParseError::Read { source: err }),
            }
        }
    }

    fn skip(&mut self, num_to_skip: u64) -> ParseResult<u64> {
        // io::Read has no portable skip, so drain through a scratch buffer.
        let mut scratch = [0u8; 4096];
        let want = num_to_skip.min(scratch.len() as u64) as usize;
        self.read(&mut scratch[..want]).map(|count| count as u64)
    }

    fn position(&self) -> u64 {
        self.position
    }
}

//!
//! Shared helpers for unit tests.
//!

use crate::errors::{ParseError, ParseResult};
use crate::reader::Reader;

///
/// A [`Reader`] that serves its data in fixed chunks, reporting "no data
/// yet" (a zero-byte read) once at every chunk boundary.  This simulates a
/// slow incremental source and forces parsers through their suspend/resume
/// paths.
///
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    served_in_chunk: usize,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0);
        ChunkedReader {
            data,
            pos: 0,
            chunk_size,
            served_in_chunk: 0,
        }
    }
}

impl Reader for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> ParseResult<usize> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        if self.served_in_chunk == self.chunk_size {
            self.served_in_chunk = 0;
            return Ok(0);
        }
        let available = (self.chunk_size - self.served_in_chunk).min(self.data.len() - self.pos);
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&self.data[self.pos..self.pos + count]);
        self.pos += count;
        self.served_in_chunk += count;
        Ok(count)
    }

    fn skip(&mut self, num_to_skip: u64) -> ParseResult<u64> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        if self.served_in_chunk == self.chunk_size {
            self.served_in_chunk = 0;
            return Ok(0);
        }
        let available = (self.chunk_size - self.served_in_chunk).min(self.data.len() - self.pos);
        let count = (num_to_skip as usize).min(available);
        self.pos += count;
        self.served_in_chunk += count;
        Ok(count as u64)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

//!
//! Leaf parsers for byte-valued EBML kinds: UTF-8/ASCII strings, opaque
//! binary payloads, and the ID-valued body used by SeekID.
//!
//! Unlike the integer parsers these read in bulk, asking the reader for all
//! remaining bytes at once and accepting whatever prefix it can supply.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::ids::Id;
use crate::parser::{ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;

// Parsers for bodies the surrounding context cannot hold are rejected up
// front; usize::MAX guards the cast on 32-bit targets.
fn check_byte_size(metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
    if metadata.has_unknown_size()
        || metadata.size > max_size
        || metadata.size > usize::MAX as u64
    {
        Err(ParseError::InvalidElementSize {
            position: metadata.position,
        })
    } else {
        Ok(())
    }
}

///
/// Parses an EBML string element.  Trailing NUL padding, which Matroska
/// permits for in-place overwrites, is stripped; the remaining bytes must
/// be valid UTF-8.
///
#[derive(Debug, Default)]
pub struct StringParser {
    default_value: String,
    bytes: Vec<u8>,
    position: u64,
    num_bytes_remaining: Option<u64>,
    value: String,
}

impl StringParser {
    pub fn new(default_value: &str) -> Self {
        StringParser {
            default_value: default_value.to_owned(),
            bytes: Vec::new(),
            position: 0,
            num_bytes_remaining: None,
            value: String::new(),
        }
    }
}

impl ElementParser for StringParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        check_byte_size(metadata, max_size)?;
        self.bytes.clear();
        self.position = metadata.position;
        self.num_bytes_remaining = Some(metadata.size);
        self.value = self.default_value.clone();
        Ok(())
    }

    fn feed(
        &mut self,
        _callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        let status = read_into(reader, &mut self.bytes, &mut self.num_bytes_remaining, bytes_read)?;
        if status.is_complete() {
            let end = self
                .bytes
                .iter()
                .rposition(|&byte| byte != 0)
                .map_or(0, |index| index + 1);
            self.bytes.truncate(end);
            self.value = String::from_utf8(std::mem::take(&mut self.bytes)).map_err(|_| {
                ParseError::InvalidElementValue {
                    position: self.position,
                }
            })?;
        }
        Ok(status)
    }
}

impl ValueParser for StringParser {
    type Value = String;

    fn value(&self) -> &String {
        &self.value
    }

    fn take_value(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    fn default_value(&self) -> String {
        self.default_value.clone()
    }
}

///
/// Parses an opaque binary element.
///
#[derive(Debug, Default)]
pub struct BinaryParser {
    value: Vec<u8>,
    num_bytes_remaining: Option<u64>,
}

impl ElementParser for BinaryParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        check_byte_size(metadata, max_size)?;
        self.value.clear();
        self.num_bytes_remaining = Some(metadata.size);
        Ok(())
    }

    fn feed(
        &mut self,
        _callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        read_into(reader, &mut self.value, &mut self.num_bytes_remaining, bytes_read)
    }
}

impl ValueParser for BinaryParser {
    type Value = Vec<u8>;

    fn value(&self) -> &Vec<u8> {
        &self.value
    }

    fn take_value(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.value)
    }
}

///
/// Parses an element whose body is itself an encoded element ID, as used by
/// SeekID.  The declared size must match the ID's own encoded length.
///
#[derive(Debug, Default)]
pub struct IdElementParser {
    bytes: Vec<u8>,
    position: u64,
    num_bytes_remaining: Option<u64>,
    value: Id,
}

impl ElementParser for IdElementParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.size < 1 || metadata.size > 4 || metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.bytes.clear();
        self.position = metadata.position;
        self.num_bytes_remaining = Some(metadata.size);
        self.value = Id::default();
        Ok(())
    }

    fn feed(
        &mut self,
        _callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        let status = read_into(reader, &mut self.bytes, &mut self.num_bytes_remaining, bytes_read)?;
        if status.is_complete() {
            let first = self.bytes[0];
            // The marker bit must agree with the declared size.
            if first == 0 || (8 - first.ilog2()) as usize != self.bytes.len() {
                return Err(ParseError::InvalidElementValue {
                    position: self.position,
                });
            }
            let mut value = 0u64;
            for &byte in &self.bytes {
                value = value << 8 | u64::from(byte);
            }
            self.value = Id::new(value);
        }
        Ok(status)
    }
}

impl ValueParser for IdElementParser {
    type Value = Id;

    fn value(&self) -> &Id {
        &self.value
    }

    fn take_value(&mut self) -> Id {
        std::mem::take(&mut self.value)
    }
}

fn read_into(
    reader: &mut dyn Reader,
    buffer: &mut Vec<u8>,
    num_bytes_remaining: &mut Option<u64>,
    bytes_read: &mut u64,
) -> ParseResult<FeedStatus> {
    loop {
        let remaining = match num_bytes_remaining {
            Some(remaining) => *remaining,
            None => unreachable!("feed called before init"),
        };
        if remaining == 0 {
            return Ok(FeedStatus::Complete);
        }
        let start = buffer.len();
        buffer.resize(start + remaining as usize, 0);
        let result = reader.read(&mut buffer[start..]);
        let count = match result {
            Ok(count) => count,
            Err(error) => {
                buffer.truncate(start);
                return Err(error);
            }
        };
        buffer.truncate(start + count);
        if count == 0 {
            return Ok(FeedStatus::Partial);
        }
        *bytes_read += count as u64;
        *num_bytes_remaining = Some(remaining - count as u64);
    }
}

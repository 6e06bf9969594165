//!
//! Leaf parsers for EBML integer kinds: unsigned, signed, date, and the
//! boolean restriction of unsigned.
//!
//! EBML integers are big-endian and occupy exactly the element's declared
//! size, zero to eight bytes.  A zero-size element yields the parser's
//! configured default.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::parser::{read_byte, ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;

///
/// Parses an unsigned EBML integer of up to eight bytes.
///
#[derive(Debug, Default)]
pub struct UnsignedIntParser {
    default_value: u64,
    value: u64,
    started: bool,
    num_bytes_remaining: Option<u64>,
}

impl UnsignedIntParser {
    ///
    /// Creates a parser whose zero-size and absent value is
    /// `default_value` instead of zero.
    ///
    pub fn new(default_value: u64) -> Self {
        UnsignedIntParser {
            default_value,
            value: 0,
            started: false,
            num_bytes_remaining: None,
        }
    }
}

impl ElementParser for UnsignedIntParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        check_int_size(metadata, max_size, 8)?;
        self.value = self.default_value;
        self.started = false;
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
        loop {
            let remaining = match self.num_bytes_remaining {
                Some(remaining) => remaining,
                None => unreachable!("feed called before init"),
            };
            if remaining == 0 {
                return Ok(FeedStatus::Complete);
            }
            let byte = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;
            // The default only stands for a zero-size element.
            if !self.started {
                self.value = 0;
                self.started = true;
            }
            self.value = self.value << 8 | u64::from(byte);
            self.num_bytes_remaining = Some(remaining - 1);
        }
    }
}

impl ValueParser for UnsignedIntParser {
    type Value = u64;

    fn value(&self) -> &u64 {
        &self.value
    }

    fn take_value(&mut self) -> u64 {
        std::mem::take(&mut self.value)
    }

    fn default_value(&self) -> u64 {
        self.default_value
    }
}

///
/// Parses a signed EBML integer of up to eight bytes.  The value is
/// sign-extended from its encoded width.
///
#[derive(Debug, Default)]
pub struct SignedIntParser {
    default_value: i64,
    value: i64,
    started: bool,
    num_bytes_remaining: Option<u64>,
}

impl SignedIntParser {
    pub fn new(default_value: i64) -> Self {
        SignedIntParser {
            default_value,
            value: 0,
            started: false,
            num_bytes_remaining: None,
        }
    }
}

impl ElementParser for SignedIntParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        check_int_size(metadata, max_size, 8)?;
        self.value = self.default_value;
        self.started = false;
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
        loop {
            let remaining = match self.num_bytes_remaining {
                Some(remaining) => remaining,
                None => unreachable!("feed called before init"),
            };
            if remaining == 0 {
                return Ok(FeedStatus::Complete);
            }
            let byte = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;
            if !self.started {
                // Sign-extend from the first encoded byte.
                self.value = if byte & 0x80 != 0 { -1 } else { 0 };
                self.started = true;
            }
            self.value = self.value << 8 | i64::from(byte);
            self.num_bytes_remaining = Some(remaining - 1);
        }
    }
}

impl ValueParser for SignedIntParser {
    type Value = i64;

    fn value(&self) -> &i64 {
        &self.value
    }

    fn take_value(&mut self) -> i64 {
        std::mem::take(&mut self.value)
    }

    fn default_value(&self) -> i64 {
        self.default_value
    }
}

///
/// Parses an EBML date: a signed integer counting nanoseconds relative to
/// the Matroska epoch (2001-01-01T00:00:00 UTC), always encoded in exactly
/// eight bytes when present.
///
#[derive(Debug, Default)]
pub struct DateParser {
    inner: SignedIntParser,
}

impl DateParser {
    pub fn new(default_value: i64) -> Self {
        DateParser {
            inner: SignedIntParser::new(default_value),
        }
    }
}

impl ElementParser for DateParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.size != 0 && metadata.size != 8 {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.inner.init(metadata, max_size)
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        self.inner.feed(callback, reader, bytes_read)
    }
}

impl ValueParser for DateParser {
    type Value = i64;

    fn value(&self) -> &i64 {
        self.inner.value()
    }

    fn take_value(&mut self) -> i64 {
        self.inner.take_value()
    }

    fn default_value(&self) -> i64 {
        self.inner.default_value()
    }
}

///
/// Parses an EBML unsigned integer restricted to 0 or 1.  Any other decoded
/// value is rejected, however it was padded.
///
#[derive(Debug, Default)]
pub struct BoolParser {
    inner: UnsignedIntParser,
    position: u64,
}

impl BoolParser {
    pub fn new(default_value: bool) -> Self {
        BoolParser {
            inner: UnsignedIntParser::new(u64::from(default_value)),
            position: 0,
        }
    }
}

impl ElementParser for BoolParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        self.position = metadata.position;
        self.inner.init(metadata, max_size)
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        let status = self.inner.feed(callback, reader, bytes_read)?;
        if status.is_complete() && *self.inner.value() > 1 {
            return Err(ParseError::InvalidElementValue {
                position: self.position,
            });
        }
        Ok(status)
    }
}

impl ValueParser for BoolParser {
    type Value = bool;

    fn value(&self) -> &bool {
        if *self.inner.value() == 1 {
            &true
        } else {
            &false
        }
    }

    fn take_value(&mut self) -> bool {
        self.inner.take_value() == 1
    }

    fn default_value(&self) -> bool {
        self.inner.default_value() == 1
    }
}

pub(crate) fn check_int_size(
    metadata: &ElementMetadata,
    max_size: u64,
    limit: u64,
) -> ParseResult<()> {
    if metadata.has_unknown_size() || metadata.size > limit || metadata.size > max_size {
        Err(ParseError::InvalidElementSize {
            position: metadata.position,
        })
    } else {
        Ok(())
    }
}

//!
//! EBML variable-length integer primitives: the resumable decoders used by
//! every composite parser, and encoding helpers for building streams.
//!
//! A vint's first byte carries a marker bit whose position gives the total
//! encoded length (1-8 bytes); the remaining bits and any following bytes
//! carry the big-endian value.  Element IDs keep the marker bits as part of
//! their value, element sizes strip them.
//!

use crate::errors::{ParseError, ParseResult};
use crate::element::UNKNOWN_ELEMENT_SIZE;
use crate::ids::Id;
use crate::parser::{read_byte, FeedStatus};
use crate::reader::Reader;

///
/// Trait to enable easy serialization to a vint.
///
/// This is only available for types that can be cast as `u64`.
///
pub trait Vint: Into<u64> + Copy {
    ///
    /// Returns a representation of the current value as a vint array, using
    /// the smallest width that can hold it.
    ///
    /// # Errors
    ///
    /// This can return an error if the value is too large to be
    /// representable as a vint.
    ///
    fn as_vint(&self) -> ParseResult<Vec<u8>> {
        let val: u64 = (*self).into();
        check_size_u64(val, 8)?;
        let mut length = 1;
        while length <= 8 {
            // Each width reserves its all-ones data pattern for "unknown
            // size", so the boundary values (127, 16383, ...) need the next
            // width up.
            if val < (1 << (7 * length)) - 1 {
                break;
            }
            length += 1;
        }

        Ok(as_vint_no_check_u64(val, length))
    }

    ///
    /// Returns a representation of the current value as a vint array with a
    /// specified length.
    ///
    /// # Errors
    ///
    /// This can return an error if the value does not fit in `length` bytes.
    ///
    fn as_vint_with_length(&self, length: usize) -> ParseResult<Vec<u8>> {
        let val: u64 = (*self).into();
        check_size_u64(val, length)?;
        Ok(as_vint_no_check_u64(val, length))
    }
}

impl Vint for u64 {}
impl Vint for u32 {}
impl Vint for u16 {}
impl Vint for u8 {}

#[inline]
fn check_size_u64(val: u64, max_length: usize) -> ParseResult<()> {
    // The all-ones pattern at a given width is reserved for "unknown size",
    // so the largest encodable value is one below it.
    if val >= (1 << (max_length * 7)) - 1 {
        Err(ParseError::InvalidElementValue { position: 0 })
    } else {
        Ok(())
    }
}

#[inline]
fn as_vint_no_check_u64(val: u64, length: usize) -> Vec<u8> {
    let bytes: [u8; 8] = val.to_be_bytes();
    let mut result: Vec<u8> = Vec::from(&bytes[(8 - length)..]);
    result[0] |= 1 << (8 - length);
    result
}

///
/// Encodes the reserved "unknown size" pattern at the given width.
///
pub fn unknown_size_vint(length: usize) -> Vec<u8> {
    let mut result = vec![0xFF; length];
    result[0] = 0xFF >> (length - 1) | (1 << (8 - length)) as u8;
    result
}

///
/// A resumable decoder for a single EBML variable-length integer.
///
/// Bytes are consumed one at a time; if the reader runs dry mid-decode the
/// parser remembers how far it got and picks up from there on the next
/// [`feed`](VarIntParser::feed) call.
///
#[derive(Debug, Default)]
pub struct VarIntParser {
    num_bytes_remaining: Option<u32>,
    total_data_bytes: u32,
    value: u64,
}

impl VarIntParser {
    pub fn feed(&mut self, reader: &mut dyn Reader, bytes_read: &mut u64) -> ParseResult<FeedStatus> {
        *bytes_read = 0;

        if self.num_bytes_remaining.is_none() {
            let first = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;

            if first == 0 {
                // A ninth length-indicator bit would be required.
                return Err(ParseError::InvalidElementValue {
                    position: reader.position() - 1,
                });
            }

            let length = 8 - first.ilog2();
            self.total_data_bytes = length - 1;
            self.value = u64::from(first) & !(1u64 << (8 - length));
            self.num_bytes_remaining = Some(length - 1);
        }

        while let Some(remaining) = self.num_bytes_remaining {
            if remaining == 0 {
                return Ok(FeedStatus::Complete);
            }
            let byte = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;
            self.value = self.value << 8 | u64::from(byte);
            self.num_bytes_remaining = Some(remaining - 1);
        }

        Ok(FeedStatus::Complete)
    }

    ///
    /// The decoded value, marker bit stripped.  Must not be called until the
    /// parse has completed.
    ///
    pub fn value(&self) -> u64 {
        debug_assert_eq!(self.num_bytes_remaining, Some(0));
        self.value
    }

    ///
    /// How many bytes the integer occupied in the stream.  Must not be
    /// called until the parse has completed.
    ///
    pub fn encoded_length(&self) -> u32 {
        debug_assert_eq!(self.num_bytes_remaining, Some(0));
        self.total_data_bytes + 1
    }
}

///
/// A resumable decoder for an EBML element ID.
///
/// IDs are 1-4 bytes and keep their marker bits: the decoded [`Id`] is the
/// full encoded pattern.
///
#[derive(Debug, Default)]
pub struct IdParser {
    num_bytes_remaining: Option<u32>,
    value: u64,
}

impl IdParser {
    pub fn feed(&mut self, reader: &mut dyn Reader, bytes_read: &mut u64) -> ParseResult<FeedStatus> {
        *bytes_read = 0;

        if self.num_bytes_remaining.is_none() {
            let first = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;

            if first < 0x10 {
                // More than three leading zero bits: not a Matroska ID.
                return Err(ParseError::InvalidElementId {
                    position: reader.position() - 1,
                });
            }

            self.value = u64::from(first);
            self.num_bytes_remaining = Some(8 - first.ilog2() - 1);
        }

        while let Some(remaining) = self.num_bytes_remaining {
            if remaining == 0 {
                return Ok(FeedStatus::Complete);
            }
            let byte = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;
            self.value = self.value << 8 | u64::from(byte);
            self.num_bytes_remaining = Some(remaining - 1);
        }

        Ok(FeedStatus::Complete)
    }

    ///
    /// The decoded ID.  Must not be called until the parse has completed.
    ///
    pub fn id(&self) -> Id {
        debug_assert_eq!(self.num_bytes_remaining, Some(0));
        Id::new(self.value)
    }
}

///
/// A resumable decoder for an EBML element size.
///
/// Marker bits are stripped.  The reserved all-ones pattern at any width
/// decodes to [`UNKNOWN_ELEMENT_SIZE`].
///
#[derive(Debug, Default)]
pub struct SizeParser {
    uint_parser: VarIntParser,
}

impl SizeParser {
    pub fn feed(&mut self, reader: &mut dyn Reader, bytes_read: &mut u64) -> ParseResult<FeedStatus> {
        self.uint_parser.feed(reader, bytes_read)
    }

    ///
    /// The decoded size, or [`UNKNOWN_ELEMENT_SIZE`] for the reserved
    /// pattern.  Must not be called until the parse has completed.
    ///
    pub fn size(&self) -> u64 {
        let all_ones = (1u64 << (7 * self.uint_parser.encoded_length())) - 1;
        if self.uint_parser.value() == all_ones {
            UNKNOWN_ELEMENT_SIZE
        } else {
            self.uint_parser.value()
        }
    }

    ///
    /// How many bytes the size field occupied in the stream.  Must not be
    /// called until the parse has completed.
    ///
    pub fn encoded_length(&self) -> u32 {
        self.uint_parser.encoded_length()
    }
}

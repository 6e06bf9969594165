//!
//! Leaf parser for EBML floating-point elements.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::parser::{read_byte, ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;

///
/// Parses an EBML float: IEEE-754 big-endian, either single (4 bytes) or
/// double (8 bytes) precision.  Singles are widened to `f64`.  Any other
/// non-zero size is rejected.
///
#[derive(Debug, Default)]
pub struct FloatParser {
    default_value: f64,
    value: f64,
    bits: u64,
    total_size: u64,
    num_bytes_remaining: Option<u64>,
}

impl FloatParser {
    pub fn new(default_value: f64) -> Self {
        FloatParser {
            default_value,
            value: 0.0,
            bits: 0,
            total_size: 0,
            num_bytes_remaining: None,
        }
    }
}

impl ElementParser for FloatParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if !(metadata.size == 0 || metadata.size == 4 || metadata.size == 8)
            || metadata.size > max_size
        {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.value = self.default_value;
        self.bits = 0;
        self.total_size = metadata.size;
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
                if self.total_size == 4 {
                    self.value = f64::from(f32::from_bits(self.bits as u32));
                } else if self.total_size == 8 {
                    self.value = f64::from_bits(self.bits);
                }
                return Ok(FeedStatus::Complete);
            }
            let byte = match read_byte(reader)? {
                Some(byte) => byte,
                None => return Ok(FeedStatus::Partial),
            };
            *bytes_read += 1;
            self.bits = self.bits << 8 | u64::from(byte);
            self.num_bytes_remaining = Some(remaining - 1);
        }
    }
}

impl ValueParser for FloatParser {
    type Value = f64;

    fn value(&self) -> &f64 {
        &self.value
    }

    fn take_value(&mut self) -> f64 {
        std::mem::take(&mut self.value)
    }

    fn default_value(&self) -> f64 {
        self.default_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Id;
    use crate::reader::BufferReader;
    use crate::test_utils::ChunkedReader;

    struct NoopCallback;
    impl Callback for NoopCallback {}

    fn metadata(size: u64) -> ElementMetadata {
        ElementMetadata {
            id: Id::DURATION,
            header_size: 3,
            size,
            position: 0,
        }
    }

    fn parse(size: u64, data: &[u8]) -> f64 {
        let mut parser = FloatParser::default();
        parser.init(&metadata(size), u64::MAX).unwrap();
        let mut reader = BufferReader::new(data.to_vec());
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        *parser.value()
    }

    #[test]
    fn single_precision_widens() {
        assert_eq!(1.5, parse(4, &1.5f32.to_be_bytes()));
        assert_eq!(-0.25, parse(4, &(-0.25f32).to_be_bytes()));
    }

    #[test]
    fn double_precision() {
        assert_eq!(
            core::f64::consts::PI,
            parse(8, &core::f64::consts::PI.to_be_bytes())
        );
    }

    #[test]
    fn zero_size_yields_default() {
        let mut parser = FloatParser::new(8000.0);
        parser.init(&metadata(0), u64::MAX).unwrap();
        let mut reader = BufferReader::new(vec![]);
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        assert_eq!(8000.0, *parser.value());
    }

    #[test]
    fn rejects_other_sizes() {
        let mut parser = FloatParser::default();
        for size in [1, 2, 3, 5, 6, 7, 9] {
            assert!(matches!(
                parser.init(&metadata(size), u64::MAX),
                Err(ParseError::InvalidElementSize { .. })
            ));
        }
    }

    #[test]
    fn resumes_across_feeds() {
        let data = 2.5f64.to_be_bytes().to_vec();
        let mut reader = ChunkedReader::new(data, 3);
        let mut parser = FloatParser::default();
        parser.init(&metadata(8), u64::MAX).unwrap();
        let mut total = 0;
        loop {
            let mut bytes_read = 0;
            let status = parser
                .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
                .unwrap();
            total += bytes_read;
            if status.is_complete() {
                break;
            }
        }
        assert_eq!(8, total);
        assert_eq!(2.5, *parser.value());
    }
}

//!
//! Parsers that consume an element's body without interpreting it: the
//! internal skipper used for [`Action::Skip`](crate::Action::Skip), the
//! handler for elements whose ID is not in the schema, and the handler for
//! Void padding.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::parser::{ElementParser, FeedStatus};
use crate::reader::Reader;

///
/// Discards an element's body by advancing the reader, without surfacing
/// any callback events.  Requires a known size.
///
#[derive(Debug, Default)]
pub struct SkipParser {
    num_bytes_remaining: Option<u64>,
}

impl ElementParser for SkipParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.has_unknown_size() || metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
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
            let skipped = reader.skip(remaining)?;
            if skipped == 0 {
                return Ok(FeedStatus::Partial);
            }
            *bytes_read += skipped;
            self.num_bytes_remaining = Some(remaining - skipped);
        }
    }
}

///
/// Handles an element whose ID the schema does not recognize, by handing
/// its raw body to
/// [`Callback::on_unknown_element`](crate::Callback::on_unknown_element).
///
/// An unrecognized element with an unknown size is unrecoverable: nothing
/// in the stream tells us where it ends.
///
#[derive(Debug, Default)]
pub struct UnknownParser {
    metadata: ElementMetadata,
    num_bytes_remaining: Option<u64>,
}

impl ElementParser for UnknownParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.has_unknown_size() {
            return Err(ParseError::IndefiniteUnknownElement {
                position: metadata.position,
            });
        }
        if metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.metadata = *metadata;
        self.num_bytes_remaining = Some(metadata.size);
        Ok(())
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        let mut remaining = match self.num_bytes_remaining {
            Some(remaining) => remaining,
            None => unreachable!("feed called before init"),
        };
        let before = remaining;
        let result = callback.on_unknown_element(&self.metadata, reader, &mut remaining);
        *bytes_read = before - remaining;
        self.num_bytes_remaining = Some(remaining);
        result
    }
}

///
/// Handles a Void element by handing its raw body to
/// [`Callback::on_void`](crate::Callback::on_void).
///
#[derive(Debug, Default)]
pub struct VoidParser {
    metadata: ElementMetadata,
    num_bytes_remaining: Option<u64>,
}

impl ElementParser for VoidParser {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.has_unknown_size() || metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.metadata = *metadata;
        self.num_bytes_remaining = Some(metadata.size);
        Ok(())
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        let mut remaining = match self.num_bytes_remaining {
            Some(remaining) => remaining,
            None => unreachable!("feed called before init"),
        };
        let before = remaining;
        let result = callback.on_void(&self.metadata, reader, &mut remaining);
        *bytes_read = before - remaining;
        self.num_bytes_remaining = Some(remaining);
        result
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

    struct RecordingCallback {
        unknown: Vec<(Id, Vec<u8>)>,
        voids: u64,
    }

    impl Callback for RecordingCallback {
        fn on_unknown_element(
            &mut self,
            metadata: &ElementMetadata,
            reader: &mut dyn Reader,
            bytes_remaining: &mut u64,
        ) -> ParseResult<FeedStatus> {
            let mut body = vec![0u8; *bytes_remaining as usize];
            let mut filled = 0;
            while filled < body.len() {
                let count = reader.read(&mut body[filled..])?;
                if count == 0 {
                    body.truncate(filled);
                    break;
                }
                filled += count;
            }
            *bytes_remaining -= filled as u64;
            self.unknown.push((metadata.id, body));
            if *bytes_remaining == 0 {
                Ok(FeedStatus::Complete)
            } else {
                Ok(FeedStatus::Partial)
            }
        }

        fn on_void(
            &mut self,
            _metadata: &ElementMetadata,
            reader: &mut dyn Reader,
            bytes_remaining: &mut u64,
        ) -> ParseResult<FeedStatus> {
            let skipped = reader.skip(*bytes_remaining)?;
            *bytes_remaining -= skipped;
            self.voids += 1;
            if *bytes_remaining == 0 {
                Ok(FeedStatus::Complete)
            } else {
                Ok(FeedStatus::Partial)
            }
        }
    }

    fn metadata(id: Id, size: u64) -> ElementMetadata {
        ElementMetadata {
            id,
            header_size: 2,
            size,
            position: 0,
        }
    }

    #[test]
    fn skip_consumes_exact_size() {
        let mut parser = SkipParser::default();
        parser.init(&metadata(Id::BLOCK, 5), u64::MAX).unwrap();
        let mut reader = BufferReader::new(vec![1, 2, 3, 4, 5, 6, 7]);
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        assert_eq!(5, bytes_read);
        assert_eq!(5, reader.position());
    }

    #[test]
    fn skip_resumes() {
        let mut parser = SkipParser::default();
        parser.init(&metadata(Id::BLOCK, 6), u64::MAX).unwrap();
        let mut reader = ChunkedReader::new(vec![0; 6], 4);
        let mut bytes_read = 0;
        assert_eq!(
            FeedStatus::Partial,
            parser
                .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
                .unwrap()
        );
        assert_eq!(4, bytes_read);
        assert!(parser
            .feed(&mut NoopCallback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        assert_eq!(2, bytes_read);
    }

    #[test]
    fn unknown_hands_body_to_callback() {
        let mut parser = UnknownParser::default();
        let id = Id::new(0x7FFF);
        parser.init(&metadata(id, 3), u64::MAX).unwrap();
        let mut callback = RecordingCallback {
            unknown: vec![],
            voids: 0,
        };
        let mut reader = BufferReader::new(vec![0xAA, 0xBB, 0xCC]);
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut callback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        assert_eq!(3, bytes_read);
        assert_eq!(vec![(id, vec![0xAA, 0xBB, 0xCC])], callback.unknown);
    }

    #[test]
    fn unknown_rejects_unknown_size() {
        let mut parser = UnknownParser::default();
        let meta = ElementMetadata {
            id: Id::new(0x7FFF),
            header_size: 2,
            size: crate::element::UNKNOWN_ELEMENT_SIZE,
            position: 42,
        };
        assert!(matches!(
            parser.init(&meta, u64::MAX),
            Err(ParseError::IndefiniteUnknownElement { position: 42 })
        ));
    }

    #[test]
    fn void_notifies_callback() {
        let mut parser = VoidParser::default();
        parser.init(&metadata(Id::VOID, 4), u64::MAX).unwrap();
        let mut callback = RecordingCallback {
            unknown: vec![],
            voids: 0,
        };
        let mut reader = BufferReader::new(vec![0; 4]);
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut callback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        assert_eq!(4, bytes_read);
        assert_eq!(1, callback.voids);
    }
}

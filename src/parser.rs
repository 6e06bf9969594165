//!
//! The two-phase contract every element parser implements, and small byte
//! helpers shared by the leaf parsers.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::ParseResult;
use crate::reader::Reader;
use crate::webm_parser::Ancestory;

///
/// The outcome of a [`feed`](ElementParser::feed) call that did not fail.
///
/// `Partial` is not an error: it means progress was made (possibly zero
/// bytes) and the caller should feed again once more input is available.
///
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// The element has been fully parsed.  Feeding the parser again without
    /// re-initializing it is a contract violation.
    Complete,
    /// More input is required.
    Partial,
}

impl FeedStatus {
    pub fn is_complete(self) -> bool {
        self == FeedStatus::Complete
    }
}

///
/// A parser for a single element, leaf or composite.
///
/// The lifecycle is always: one call to [`init`] with the element's
/// metadata, then [`feed`] repeatedly until it returns something other than
/// `Ok(FeedStatus::Partial)`.  The contract is uniform so the composite
/// engine can treat a one-byte scalar and a multi-megabyte nested master
/// identically.
///
/// [`init`]: ElementParser::init
/// [`feed`]: ElementParser::feed
///
pub trait ElementParser {
    ///
    /// Prepares the parser for an element described by `metadata`.
    /// `max_size` is the number of body bytes the surrounding context can
    /// still supply; a declared size above it (or an unknown size where the
    /// kind forbids one) fails immediately.
    ///
    /// Re-initializing an existing parser resets it completely; parsers are
    /// reused across repeated occurrences of their element.
    ///
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()>;

    ///
    /// Attempts to make progress.  The number of bytes consumed from
    /// `reader` *by this call alone* is written to `bytes_read` whether the
    /// call succeeds or fails.
    ///
    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus>;

    ///
    /// Prepares the parser to resume at `child_metadata` after the caller
    /// repositioned the reader, with `ancestory` naming the master elements
    /// that would have been descended through on the way there.  Only master
    /// parsers have children to route this to; the engine never calls it on
    /// a leaf.
    ///
    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata) {
        let _ = (ancestory, child_metadata);
        debug_assert!(false, "init_after_seek called on a parser without children");
    }

    ///
    /// A child header this parser consumed that turned out to lie beyond its
    /// own end.  Unknown-size masters discover their end by reading the
    /// header of the first element that is not one of their children; that
    /// header is surfaced here so the parent can dispatch it without reading
    /// it twice.
    ///
    fn cached_metadata(&self) -> Option<ElementMetadata> {
        None
    }
}

///
/// An [`ElementParser`] that produces a value once parsing completes.
///
pub trait ValueParser: ElementParser {
    type Value: Default;

    ///
    /// Borrows the parsed value.  Must not be called before the parse has
    /// completed.
    ///
    fn value(&self) -> &Self::Value;

    ///
    /// Moves the parsed value out of the parser.  Must not be called before
    /// the parse has completed.
    ///
    fn take_value(&mut self) -> Self::Value;

    ///
    /// The value this parser yields for an element that never appears.
    /// Leaf parsers override this to surface their configured schema
    /// default.
    ///
    fn default_value(&self) -> Self::Value {
        Self::Value::default()
    }
}

///
/// Reads a single byte.  `Ok(None)` means no data is available right now;
/// the caller should suspend with [`FeedStatus::Partial`].
///
pub(crate) fn read_byte(reader: &mut dyn Reader) -> ParseResult<Option<u8>> {
    let mut buf = [0u8; 1];
    let count = reader.read(&mut buf)?;
    Ok(if count == 1 { Some(buf[0]) } else { None })
}

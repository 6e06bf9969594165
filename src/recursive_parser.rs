//!
//! Support for elements that may nest themselves (ChapterAtom inside
//! ChapterAtom, SimpleTag inside SimpleTag).
//!
//! Building such a parser eagerly would recurse forever, so the inner
//! parser is constructed lazily from a factory the first time the element
//! actually appears, one level deeper than its parent.  A depth cap guards
//! against maliciously deep files.
//!

use crate::callback::Callback;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::parser::{ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;
use crate::webm_parser::Ancestory;

/// Deeper nesting than any sane file produces.
pub const MAX_RECURSION_DEPTH: usize = 25;

///
/// Wraps a self-nesting parser, deferring its construction until first use.
///
pub struct RecursiveParser<P: ElementParser> {
    factory: fn(usize) -> P,
    depth: usize,
    inner: Option<Box<P>>,
}

impl<P: ElementParser> RecursiveParser<P> {
    ///
    /// `factory` builds the parser for a given nesting depth; `depth` is the
    /// depth this instance sits at.
    ///
    pub fn new(factory: fn(usize) -> P, depth: usize) -> Self {
        RecursiveParser {
            factory,
            depth,
            inner: None,
        }
    }

    fn inner(&mut self) -> &mut P {
        let factory = self.factory;
        let depth = self.depth;
        self.inner.get_or_insert_with(|| Box::new(factory(depth)))
    }
}

impl<P: ElementParser> ElementParser for RecursiveParser<P> {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(ParseError::RecursionLimitExceeded);
        }
        self.inner().init(metadata, max_size)
    }

    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata) {
        if self.depth >= MAX_RECURSION_DEPTH {
            debug_assert!(false, "seek into a subtree beyond the recursion limit");
            return;
        }
        self.inner().init_after_seek(ancestory, child_metadata);
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        self.inner().feed(callback, reader, bytes_read)
    }

    fn cached_metadata(&self) -> Option<ElementMetadata> {
        self.inner.as_ref().and_then(|inner| inner.cached_metadata())
    }
}

impl<P: ValueParser> ValueParser for RecursiveParser<P> {
    type Value = P::Value;

    fn value(&self) -> &P::Value {
        match &self.inner {
            Some(inner) => inner.value(),
            None => unreachable!("value requested before first init"),
        }
    }

    fn take_value(&mut self) -> P::Value {
        self.inner().take_value()
    }
}

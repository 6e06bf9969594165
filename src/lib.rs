//!
//! An incremental, callback-driven parser for WebM (and general Matroska)
//! streams.
//!
//! The parser never buffers media and never blocks waiting for input: you
//! feed it a [`Reader`] and a [`Callback`], and it walks the EBML element
//! tree, delivering parsed elements through callback events as their final
//! bytes arrive.  When the reader temporarily runs out of data the parser
//! suspends, remembering exactly where it was, and picks up mid-element on
//! the next feed.  That makes it equally suited to parsing a file on disk
//! and to parsing a live stream as it is being written.
//!
//! ## Example
//!
//! ```no_run
//! use webm_incremental::{
//!     Callback, ElementMetadata, Info, IoReader, ParseResult, WebmParser,
//! };
//!
//! struct InfoPrinter;
//!
//! impl Callback for InfoPrinter {
//!     fn on_info(&mut self, _metadata: &ElementMetadata, info: &Info) -> ParseResult<()> {
//!         println!("timecode scale: {}", info.timecode_scale.value);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> ParseResult<()> {
//!     let file = std::fs::File::open("media.webm")?;
//!     let mut reader = IoReader::new(file);
//!     let mut parser = WebmParser::new();
//!     while !parser.feed(&mut InfoPrinter, &mut reader)?.is_complete() {}
//!     Ok(())
//! }
//! ```
//!
//! Every callback method has a default, so an implementation only needs to
//! override the events it cares about.  Begin events return an [`Action`],
//! letting the callback skip entire subtrees it has no use for; skipped
//! elements cost a seek (or a cheap discard-read) rather than a parse.
//!

mod block_parser;
mod byte_parser;
mod callback;
mod dom_types;
mod element;
mod errors;
mod float_parser;
mod ids;
mod int_parser;
mod master_parser;
mod parser;
mod reader;
mod recursive_parser;
mod schema;
mod skip_parser;
#[cfg(test)]
mod test_utils;
mod vint;
mod webm_parser;

pub use block_parser::{BasicBlockParser, BlockHeader, BlockHeaderParser, BlockValue};
pub use callback::{Action, Callback, FrameMetadata, SkipCallback};
pub use dom_types::{
    Audio, Block, BlockGroup, ChapterAtom, ChapterDisplay, Cluster, CuePoint, CueTrackPositions,
    EditionEntry, Ebml, Info, Lacing, Seek, SimpleBlock, SimpleTag, Tag, Targets, TrackEntry,
    Video,
};
pub use element::{
    Element, ElementMetadata, UNKNOWN_ELEMENT_POSITION, UNKNOWN_ELEMENT_SIZE, UNKNOWN_HEADER_SIZE,
};
pub use errors::{ParseError, ParseResult};
pub use ids::Id;
pub use parser::{ElementParser, FeedStatus, ValueParser};
pub use reader::{BufferReader, IoReader, Reader};
pub use recursive_parser::MAX_RECURSION_DEPTH;
pub use vint::{unknown_size_vint, Vint};
pub use webm_parser::{Ancestory, WebmParser};

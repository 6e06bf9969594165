//!
//! The event interface through which parsed data is delivered, and through
//! which the caller steers the traversal.
//!

use crate::dom_types::{
    Block, BlockGroup, Cluster, CuePoint, Ebml, EditionEntry, Info, Seek, SimpleBlock, Tag,
    TrackEntry,
};
use crate::element::ElementMetadata;
use crate::errors::ParseResult;
use crate::parser::FeedStatus;
use crate::reader::Reader;

///
/// The caller's per-element decision, returned from `*_begin` events.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Parse the element's body and deliver its value.
    Read,
    /// Discard the element's body without parsing it.  For an element of
    /// declared size S this advances the stream by exactly S bytes and
    /// suppresses every callback the subtree would otherwise produce.
    Skip,
}

///
/// Receives lifecycle events as the element tree is traversed.
///
/// Every method has a default: begin events answer [`Action::Read`] and raw
/// payload events (frames, unknown elements, Void bodies) skip their bytes,
/// so a unit implementation performs a full metadata-only traversal.
/// Override the events you care about.
///
/// Methods that hand over raw bytes (`on_unknown_element`, `on_void`,
/// `on_frame`) follow the same partial-progress rules as
/// [`ElementParser::feed`](crate::ElementParser::feed): decrement
/// `bytes_remaining` by what was consumed and return
/// [`FeedStatus::Partial`] if the reader ran dry.  They are re-invoked
/// until they report [`FeedStatus::Complete`].
///
#[allow(unused_variables)]
pub trait Callback {
    /// Called when any element's header has been parsed, before its body.
    fn on_element_begin(&mut self, metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    /// Called with the raw body of an element whose ID is not in the schema.
    fn on_unknown_element(
        &mut self,
        metadata: &ElementMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        skip_remaining(reader, bytes_remaining)
    }

    /// Called with the raw body of a Void (reserved padding) element.
    fn on_void(
        &mut self,
        metadata: &ElementMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        skip_remaining(reader, bytes_remaining)
    }

    fn on_ebml(&mut self, metadata: &ElementMetadata, ebml: &Ebml) -> ParseResult<()> {
        Ok(())
    }

    /// Fired exactly once per Segment, before any of its children.
    fn on_segment_begin(&mut self, metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    fn on_seek(&mut self, metadata: &ElementMetadata, seek: &Seek) -> ParseResult<()> {
        Ok(())
    }

    fn on_info(&mut self, metadata: &ElementMetadata, info: &Info) -> ParseResult<()> {
        Ok(())
    }

    /// Fired when the first block-bearing child of a Cluster is seen.
    /// `cluster` holds whatever scalar children (timecode, previous size)
    /// preceded that point.
    fn on_cluster_begin(
        &mut self,
        metadata: &ElementMetadata,
        cluster: &Cluster,
    ) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    /// Fired once a SimpleBlock's header and lacing are parsed, before its
    /// frames are delivered.
    fn on_simple_block_begin(
        &mut self,
        metadata: &ElementMetadata,
        simple_block: &SimpleBlock,
    ) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    /// Fired when a BlockGroup starts, before any of its children.
    fn on_block_group_begin(&mut self, metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    /// Fired once a Block's header and lacing are parsed, before its frames
    /// are delivered.
    fn on_block_begin(&mut self, metadata: &ElementMetadata, block: &Block) -> ParseResult<Action> {
        Ok(Action::Read)
    }

    /// Called with the raw bytes of a single frame.
    fn on_frame(
        &mut self,
        metadata: &FrameMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        skip_remaining(reader, bytes_remaining)
    }

    fn on_block_group_end(
        &mut self,
        metadata: &ElementMetadata,
        block_group: &BlockGroup,
    ) -> ParseResult<()> {
        Ok(())
    }

    fn on_cluster_end(&mut self, metadata: &ElementMetadata, cluster: &Cluster) -> ParseResult<()> {
        Ok(())
    }

    fn on_track_entry(
        &mut self,
        metadata: &ElementMetadata,
        track_entry: &TrackEntry,
    ) -> ParseResult<()> {
        Ok(())
    }

    fn on_cue_point(&mut self, metadata: &ElementMetadata, cue_point: &CuePoint) -> ParseResult<()> {
        Ok(())
    }

    fn on_edition_entry(
        &mut self,
        metadata: &ElementMetadata,
        edition_entry: &EditionEntry,
    ) -> ParseResult<()> {
        Ok(())
    }

    fn on_tag(&mut self, metadata: &ElementMetadata, tag: &Tag) -> ParseResult<()> {
        Ok(())
    }
}

///
/// Metadata for one frame inside a block.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    /// Metadata of the Block or SimpleBlock containing this frame.
    pub parent: ElementMetadata,
    /// Absolute byte position of the frame.
    pub position: u64,
    /// Size of the frame in bytes.
    pub size: u64,
}

///
/// A [`Callback`] that answers [`Action::Skip`] to every begin event.
///
/// Useful on its own for a positions-only scan, and used internally to
/// suppress events while an unknown-size subtree is being structurally
/// skipped.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipCallback;

impl Callback for SkipCallback {
    fn on_element_begin(&mut self, _metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Skip)
    }

    fn on_segment_begin(&mut self, _metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Skip)
    }

    fn on_cluster_begin(
        &mut self,
        _metadata: &ElementMetadata,
        _cluster: &Cluster,
    ) -> ParseResult<Action> {
        Ok(Action::Skip)
    }

    fn on_simple_block_begin(
        &mut self,
        _metadata: &ElementMetadata,
        _simple_block: &SimpleBlock,
    ) -> ParseResult<Action> {
        Ok(Action::Skip)
    }

    fn on_block_group_begin(&mut self, _metadata: &ElementMetadata) -> ParseResult<Action> {
        Ok(Action::Skip)
    }

    fn on_block_begin(
        &mut self,
        _metadata: &ElementMetadata,
        _block: &Block,
    ) -> ParseResult<Action> {
        Ok(Action::Skip)
    }
}

fn skip_remaining(reader: &mut dyn Reader, bytes_remaining: &mut u64) -> ParseResult<FeedStatus> {
    while *bytes_remaining > 0 {
        let skipped = reader.skip(*bytes_remaining)?;
        if skipped == 0 {
            return Ok(FeedStatus::Partial);
        }
        *bytes_remaining -= skipped;
    }
    Ok(FeedStatus::Complete)
}

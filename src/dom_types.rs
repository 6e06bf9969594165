//!
//! Plain value objects produced by the composite parsers.
//!
//! Each struct is an aggregate of [`Element`] slots, one per recognized
//! child ID, with repeated children accumulating into vectors.  A fresh
//! value is created for every occurrence of its element and handed to the
//! caller by reference once parsing of that occurrence completes.
//!

use crate::element::Element;
use crate::ids::Id;

/// The EBML header that opens every WebM/Matroska stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ebml {
    pub ebml_version: Element<u64>,
    pub ebml_read_version: Element<u64>,
    pub ebml_max_id_length: Element<u64>,
    pub ebml_max_size_length: Element<u64>,
    pub doc_type: Element<String>,
    pub doc_type_version: Element<u64>,
    pub doc_type_read_version: Element<u64>,
}

/// A single entry in a SeekHead index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Seek {
    pub id: Element<Id>,
    pub position: Element<u64>,
}

/// Global information about the segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub timecode_scale: Element<u64>,
    pub duration: Element<f64>,
    /// Nanoseconds since 2001-01-01T00:00:00 UTC (signed).
    pub date_utc: Element<i64>,
    pub title: Element<String>,
    pub muxing_app: Element<String>,
    pub writing_app: Element<String>,
}

/// How the frames of a block are laced together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lacing {
    #[default]
    None,
    Xiph,
    Fixed,
    Ebml,
}

///
/// A parsed block header.  Frame payloads are not stored here; they are
/// streamed to [`Callback::on_frame`](crate::Callback::on_frame) as they
/// are encountered.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Block {
    pub track_number: u64,
    /// Timecode relative to the cluster, in timecode-scale units.
    pub timecode: i16,
    pub num_frames: usize,
    pub lacing: Lacing,
    pub is_visible: bool,
}

/// A SimpleBlock: a block plus the flags Matroska folds into the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleBlock {
    pub track_number: u64,
    pub timecode: i16,
    pub num_frames: usize,
    pub lacing: Lacing,
    pub is_visible: bool,
    pub is_key_frame: bool,
    pub is_discardable: bool,
}

/// A BlockGroup: a block and its side data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockGroup {
    pub block: Element<Block>,
    pub duration: Element<u64>,
    pub references: Vec<Element<i64>>,
    pub discard_padding: Element<i64>,
}

/// A cluster of blocks sharing a base timecode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    pub timecode: Element<u64>,
    pub previous_size: Element<u64>,
    pub simple_blocks: Vec<Element<SimpleBlock>>,
    pub block_groups: Vec<Element<BlockGroup>>,
}

/// Video-specific track settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Video {
    pub pixel_width: Element<u64>,
    pub pixel_height: Element<u64>,
    pub display_width: Element<u64>,
    pub display_height: Element<u64>,
}

/// Audio-specific track settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Audio {
    pub sampling_frequency: Element<f64>,
    pub channels: Element<u64>,
    pub bit_depth: Element<u64>,
}

/// One track in the segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackEntry {
    pub track_number: Element<u64>,
    pub track_uid: Element<u64>,
    pub track_type: Element<u64>,
    pub is_enabled: Element<bool>,
    pub is_default: Element<bool>,
    pub uses_lacing: Element<bool>,
    pub default_duration: Element<u64>,
    pub name: Element<String>,
    pub language: Element<String>,
    pub codec_id: Element<String>,
    pub codec_private: Element<Vec<u8>>,
    pub codec_name: Element<String>,
    pub codec_delay: Element<u64>,
    pub seek_pre_roll: Element<u64>,
    pub video: Element<Video>,
    pub audio: Element<Audio>,
}

/// Where a cue point's referenced block lives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CueTrackPositions {
    pub track: Element<u64>,
    pub cluster_position: Element<u64>,
    pub relative_position: Element<u64>,
    pub block_number: Element<u64>,
}

/// An index entry mapping a timecode to block positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuePoint {
    pub time: Element<u64>,
    pub cue_track_positions: Vec<Element<CueTrackPositions>>,
}

/// A chapter name in one or more languages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterDisplay {
    pub string: Element<String>,
    pub languages: Vec<Element<String>>,
    pub countries: Vec<Element<String>>,
}

/// A chapter-navigation node.  Atoms may nest atoms of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterAtom {
    pub uid: Element<u64>,
    pub string_uid: Element<String>,
    pub time_start: Element<u64>,
    pub time_end: Element<u64>,
    pub displays: Vec<Element<ChapterDisplay>>,
    pub atoms: Vec<Element<ChapterAtom>>,
}

/// One edition of the chapter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditionEntry {
    pub atoms: Vec<Element<ChapterAtom>>,
}

/// What a tag applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Targets {
    pub type_value: Element<u64>,
    pub target_type: Element<String>,
    pub track_uids: Vec<Element<u64>>,
}

/// A single tag datum.  Simple tags may nest simple tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleTag {
    pub name: Element<String>,
    pub language: Element<String>,
    pub is_default: Element<bool>,
    pub string: Element<String>,
    pub binary: Element<Vec<u8>>,
    pub tags: Vec<Element<SimpleTag>>,
}

/// A group of tags sharing a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub targets: Element<Targets>,
    pub tags: Vec<Element<SimpleTag>>,
}

//!
//! Dispatch tables for the recognized element hierarchy.
//!
//! Each function builds the [`MasterParser`] for one master element,
//! wiring child IDs to leaf parsers (with their schema defaults) and to
//! nested masters, and attaching the begin/end events the element reports
//! through.
//!

use crate::block_parser::{BlockParser, SimpleBlockParser};
use crate::byte_parser::{BinaryParser, IdElementParser, StringParser};
use crate::dom_types::{
    Audio, Block, BlockGroup, ChapterAtom, ChapterDisplay, Cluster, CuePoint, CueTrackPositions,
    EditionEntry, Ebml, Info, Seek, SimpleTag, Tag, Targets, TrackEntry, Video,
};
use crate::float_parser::FloatParser;
use crate::ids::Id;
use crate::int_parser::{BoolParser, DateParser, SignedIntParser, UnsignedIntParser};
use crate::master_parser::MasterParser;
use crate::recursive_parser::RecursiveParser;

pub(crate) fn ebml_parser() -> MasterParser<Ebml> {
    MasterParser::new()
        .with_end(|callback, metadata, ebml: &Ebml| callback.on_ebml(metadata, ebml))
        .field(Id::EBML_VERSION, UnsignedIntParser::new(1), |e: &mut Ebml| {
            &mut e.ebml_version
        })
        .field(
            Id::EBML_READ_VERSION,
            UnsignedIntParser::new(1),
            |e: &mut Ebml| &mut e.ebml_read_version,
        )
        .field(
            Id::EBML_MAX_ID_LENGTH,
            UnsignedIntParser::new(4),
            |e: &mut Ebml| &mut e.ebml_max_id_length,
        )
        .field(
            Id::EBML_MAX_SIZE_LENGTH,
            UnsignedIntParser::new(8),
            |e: &mut Ebml| &mut e.ebml_max_size_length,
        )
        .field(
            Id::DOC_TYPE,
            StringParser::new("matroska"),
            |e: &mut Ebml| &mut e.doc_type,
        )
        .field(
            Id::DOC_TYPE_VERSION,
            UnsignedIntParser::new(1),
            |e: &mut Ebml| &mut e.doc_type_version,
        )
        .field(
            Id::DOC_TYPE_READ_VERSION,
            UnsignedIntParser::new(1),
            |e: &mut Ebml| &mut e.doc_type_read_version,
        )
}

fn seek_parser() -> MasterParser<Seek> {
    MasterParser::new()
        .with_end(|callback, metadata, seek: &Seek| callback.on_seek(metadata, seek))
        .field(Id::SEEK_ID, IdElementParser::default(), |s: &mut Seek| {
            &mut s.id
        })
        .field(
            Id::SEEK_POSITION,
            UnsignedIntParser::default(),
            |s: &mut Seek| &mut s.position,
        )
}

fn seek_head_parser() -> MasterParser<()> {
    MasterParser::new().node(Id::SEEK, seek_parser())
}

fn info_parser() -> MasterParser<Info> {
    MasterParser::new()
        .with_end(|callback, metadata, info: &Info| callback.on_info(metadata, info))
        .field(
            Id::TIMECODE_SCALE,
            UnsignedIntParser::new(1_000_000),
            |i: &mut Info| &mut i.timecode_scale,
        )
        .field(Id::DURATION, FloatParser::default(), |i: &mut Info| {
            &mut i.duration
        })
        .field(Id::DATE_UTC, DateParser::default(), |i: &mut Info| {
            &mut i.date_utc
        })
        .field(Id::TITLE, StringParser::default(), |i: &mut Info| {
            &mut i.title
        })
        .field(Id::MUXING_APP, StringParser::default(), |i: &mut Info| {
            &mut i.muxing_app
        })
        .field(Id::WRITING_APP, StringParser::default(), |i: &mut Info| {
            &mut i.writing_app
        })
}

fn block_group_parser() -> MasterParser<BlockGroup> {
    MasterParser::new()
        .with_begin(|callback, metadata, _: &BlockGroup| callback.on_block_group_begin(metadata))
        .with_end(|callback, metadata, group: &BlockGroup| {
            callback.on_block_group_end(metadata, group)
        })
        .field(Id::BLOCK, BlockParser::default(), |g: &mut BlockGroup| {
            &mut g.block
        })
        .field(
            Id::BLOCK_DURATION,
            UnsignedIntParser::default(),
            |g: &mut BlockGroup| &mut g.duration,
        )
        .repeated(
            Id::REFERENCE_BLOCK,
            SignedIntParser::default(),
            |g: &mut BlockGroup| &mut g.references,
        )
        .field(
            Id::DISCARD_PADDING,
            SignedIntParser::default(),
            |g: &mut BlockGroup| &mut g.discard_padding,
        )
}

fn cluster_parser() -> MasterParser<Cluster> {
    MasterParser::new()
        .with_deferred_begin(|callback, metadata, cluster: &Cluster| {
            callback.on_cluster_begin(metadata, cluster)
        })
        .with_end(|callback, metadata, cluster: &Cluster| {
            callback.on_cluster_end(metadata, cluster)
        })
        .field(
            Id::TIMECODE,
            UnsignedIntParser::default(),
            |c: &mut Cluster| &mut c.timecode,
        )
        .field(
            Id::PREV_SIZE,
            UnsignedIntParser::default(),
            |c: &mut Cluster| &mut c.previous_size,
        )
        .repeated(
            Id::SIMPLE_BLOCK,
            SimpleBlockParser::default(),
            |c: &mut Cluster| &mut c.simple_blocks,
        )
        .repeated(
            Id::BLOCK_GROUP,
            block_group_parser(),
            |c: &mut Cluster| &mut c.block_groups,
        )
        .starts_begin(Id::SIMPLE_BLOCK)
        .starts_begin(Id::BLOCK_GROUP)
}

fn video_parser() -> MasterParser<Video> {
    MasterParser::new()
        .field(
            Id::PIXEL_WIDTH,
            UnsignedIntParser::default(),
            |v: &mut Video| &mut v.pixel_width,
        )
        .field(
            Id::PIXEL_HEIGHT,
            UnsignedIntParser::default(),
            |v: &mut Video| &mut v.pixel_height,
        )
        .field(
            Id::DISPLAY_WIDTH,
            UnsignedIntParser::default(),
            |v: &mut Video| &mut v.display_width,
        )
        .field(
            Id::DISPLAY_HEIGHT,
            UnsignedIntParser::default(),
            |v: &mut Video| &mut v.display_height,
        )
}

fn audio_parser() -> MasterParser<Audio> {
    MasterParser::new()
        .field(
            Id::SAMPLING_FREQUENCY,
            FloatParser::new(8000.0),
            |a: &mut Audio| &mut a.sampling_frequency,
        )
        .field(Id::CHANNELS, UnsignedIntParser::new(1), |a: &mut Audio| {
            &mut a.channels
        })
        .field(Id::BIT_DEPTH, UnsignedIntParser::default(), |a: &mut Audio| {
            &mut a.bit_depth
        })
}

fn track_entry_parser() -> MasterParser<TrackEntry> {
    MasterParser::new()
        .with_end(|callback, metadata, entry: &TrackEntry| {
            callback.on_track_entry(metadata, entry)
        })
        .field(
            Id::TRACK_NUMBER,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.track_number,
        )
        .field(
            Id::TRACK_UID,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.track_uid,
        )
        .field(
            Id::TRACK_TYPE,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.track_type,
        )
        .field(
            Id::FLAG_ENABLED,
            BoolParser::new(true),
            |t: &mut TrackEntry| &mut t.is_enabled,
        )
        .field(
            Id::FLAG_DEFAULT,
            BoolParser::new(true),
            |t: &mut TrackEntry| &mut t.is_default,
        )
        .field(
            Id::FLAG_LACING,
            BoolParser::new(true),
            |t: &mut TrackEntry| &mut t.uses_lacing,
        )
        .field(
            Id::DEFAULT_DURATION,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.default_duration,
        )
        .field(Id::NAME, StringParser::default(), |t: &mut TrackEntry| {
            &mut t.name
        })
        .field(
            Id::LANGUAGE,
            StringParser::new("eng"),
            |t: &mut TrackEntry| &mut t.language,
        )
        .field(Id::CODEC_ID, StringParser::default(), |t: &mut TrackEntry| {
            &mut t.codec_id
        })
        .field(
            Id::CODEC_PRIVATE,
            BinaryParser::default(),
            |t: &mut TrackEntry| &mut t.codec_private,
        )
        .field(
            Id::CODEC_NAME,
            StringParser::default(),
            |t: &mut TrackEntry| &mut t.codec_name,
        )
        .field(
            Id::CODEC_DELAY,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.codec_delay,
        )
        .field(
            Id::SEEK_PRE_ROLL,
            UnsignedIntParser::default(),
            |t: &mut TrackEntry| &mut t.seek_pre_roll,
        )
        .field(Id::VIDEO, video_parser(), |t: &mut TrackEntry| &mut t.video)
        .field(Id::AUDIO, audio_parser(), |t: &mut TrackEntry| &mut t.audio)
}

fn tracks_parser() -> MasterParser<()> {
    MasterParser::new().node(Id::TRACK_ENTRY, track_entry_parser())
}

fn cue_track_positions_parser() -> MasterParser<CueTrackPositions> {
    MasterParser::new()
        .field(
            Id::CUE_TRACK,
            UnsignedIntParser::default(),
            |c: &mut CueTrackPositions| &mut c.track,
        )
        .field(
            Id::CUE_CLUSTER_POSITION,
            UnsignedIntParser::default(),
            |c: &mut CueTrackPositions| &mut c.cluster_position,
        )
        .field(
            Id::CUE_RELATIVE_POSITION,
            UnsignedIntParser::default(),
            |c: &mut CueTrackPositions| &mut c.relative_position,
        )
        .field(
            Id::CUE_BLOCK_NUMBER,
            UnsignedIntParser::new(1),
            |c: &mut CueTrackPositions| &mut c.block_number,
        )
}

fn cue_point_parser() -> MasterParser<CuePoint> {
    MasterParser::new()
        .with_end(|callback, metadata, cue_point: &CuePoint| {
            callback.on_cue_point(metadata, cue_point)
        })
        .field(
            Id::CUE_TIME,
            UnsignedIntParser::default(),
            |c: &mut CuePoint| &mut c.time,
        )
        .repeated(
            Id::CUE_TRACK_POSITIONS,
            cue_track_positions_parser(),
            |c: &mut CuePoint| &mut c.cue_track_positions,
        )
}

fn cues_parser() -> MasterParser<()> {
    MasterParser::new().node(Id::CUE_POINT, cue_point_parser())
}

fn chapter_display_parser() -> MasterParser<ChapterDisplay> {
    MasterParser::new()
        .field(
            Id::CHAP_STRING,
            StringParser::default(),
            |c: &mut ChapterDisplay| &mut c.string,
        )
        .repeated(
            Id::CHAP_LANGUAGE,
            StringParser::new("eng"),
            |c: &mut ChapterDisplay| &mut c.languages,
        )
        .repeated(
            Id::CHAP_COUNTRY,
            StringParser::default(),
            |c: &mut ChapterDisplay| &mut c.countries,
        )
}

pub(crate) fn chapter_atom_parser(depth: usize) -> MasterParser<ChapterAtom> {
    MasterParser::new()
        .field(
            Id::CHAPTER_UID,
            UnsignedIntParser::default(),
            |c: &mut ChapterAtom| &mut c.uid,
        )
        .field(
            Id::CHAPTER_STRING_UID,
            StringParser::default(),
            |c: &mut ChapterAtom| &mut c.string_uid,
        )
        .field(
            Id::CHAPTER_TIME_START,
            UnsignedIntParser::default(),
            |c: &mut ChapterAtom| &mut c.time_start,
        )
        .field(
            Id::CHAPTER_TIME_END,
            UnsignedIntParser::default(),
            |c: &mut ChapterAtom| &mut c.time_end,
        )
        .repeated(
            Id::CHAPTER_DISPLAY,
            chapter_display_parser(),
            |c: &mut ChapterAtom| &mut c.displays,
        )
        .repeated(
            Id::CHAPTER_ATOM,
            RecursiveParser::new(chapter_atom_parser, depth + 1),
            |c: &mut ChapterAtom| &mut c.atoms,
        )
}

fn edition_entry_parser() -> MasterParser<EditionEntry> {
    MasterParser::new()
        .with_end(|callback, metadata, entry: &EditionEntry| {
            callback.on_edition_entry(metadata, entry)
        })
        .repeated(
            Id::CHAPTER_ATOM,
            RecursiveParser::new(chapter_atom_parser, 0),
            |e: &mut EditionEntry| &mut e.atoms,
        )
}

fn chapters_parser() -> MasterParser<()> {
    MasterParser::new().node(Id::EDITION_ENTRY, edition_entry_parser())
}

fn targets_parser() -> MasterParser<Targets> {
    MasterParser::new()
        .field(
            Id::TARGET_TYPE_VALUE,
            UnsignedIntParser::new(50),
            |t: &mut Targets| &mut t.type_value,
        )
        .field(
            Id::TARGET_TYPE,
            StringParser::default(),
            |t: &mut Targets| &mut t.target_type,
        )
        .repeated(
            Id::TAG_TRACK_UID,
            UnsignedIntParser::default(),
            |t: &mut Targets| &mut t.track_uids,
        )
}

pub(crate) fn simple_tag_parser(depth: usize) -> MasterParser<SimpleTag> {
    MasterParser::new()
        .field(Id::TAG_NAME, StringParser::default(), |t: &mut SimpleTag| {
            &mut t.name
        })
        .field(
            Id::TAG_LANGUAGE,
            StringParser::new("und"),
            |t: &mut SimpleTag| &mut t.language,
        )
        .field(Id::TAG_DEFAULT, BoolParser::new(true), |t: &mut SimpleTag| {
            &mut t.is_default
        })
        .field(Id::TAG_STRING, StringParser::default(), |t: &mut SimpleTag| {
            &mut t.string
        })
        .field(Id::TAG_BINARY, BinaryParser::default(), |t: &mut SimpleTag| {
            &mut t.binary
        })
        .repeated(
            Id::SIMPLE_TAG,
            RecursiveParser::new(simple_tag_parser, depth + 1),
            |t: &mut SimpleTag| &mut t.tags,
        )
}

fn tag_parser() -> MasterParser<Tag> {
    MasterParser::new()
        .with_end(|callback, metadata, tag: &Tag| callback.on_tag(metadata, tag))
        .field(Id::TARGETS, targets_parser(), |t: &mut Tag| &mut t.targets)
        .repeated(
            Id::SIMPLE_TAG,
            RecursiveParser::new(simple_tag_parser, 0),
            |t: &mut Tag| &mut t.tags,
        )
}

fn tags_parser() -> MasterParser<()> {
    MasterParser::new().node(Id::TAG, tag_parser())
}

///
/// The Segment: the master holding everything but the EBML header.
/// Typically written with an unknown size by live muxers, which is why all
/// of its children are dispatch-table entries rather than ad-hoc cases.
///
pub(crate) fn segment_parser() -> MasterParser<()> {
    MasterParser::new()
        .with_begin(|callback, metadata, _: &()| callback.on_segment_begin(metadata))
        .node(Id::SEEK_HEAD, seek_head_parser())
        .node(Id::INFO, info_parser())
        .node(Id::CLUSTER, cluster_parser())
        .node(Id::TRACKS, tracks_parser())
        .node(Id::CUES, cues_parser())
        .node(Id::CHAPTERS, chapters_parser())
        .node(Id::TAGS, tags_parser())
}

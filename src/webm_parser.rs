//!
//! The document-level driver: feeds a whole WebM stream, dispatching the
//! top-level elements (EBML header, Segment, Void) and converting a clean
//! end of stream into completion.
//!

use std::collections::VecDeque;

use log::{debug, trace};

use crate::callback::{Action, Callback, SkipCallback};
use crate::dom_types::Ebml;
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::ids::Id;
use crate::master_parser::MasterParser;
use crate::parser::{ElementParser, FeedStatus};
use crate::reader::Reader;
use crate::schema::{ebml_parser, segment_parser};
use crate::skip_parser::{SkipParser, UnknownParser, VoidParser};
use crate::vint::{IdParser, SizeParser};

///
/// The chain of master elements enclosing some element, outermost first.
///
/// Used after a seek: the caller repositions the reader at an element
/// header, and the ancestory tells the driver which master parsers to
/// restart on the way down to it.
///
#[derive(Debug, Clone, Default)]
pub struct Ancestory {
    ids: VecDeque<Id>,
}

impl Ancestory {
    ///
    /// The ancestory of the element with the given ID, if the ID is a
    /// recognized seek target.  Top-level elements have an empty ancestory.
    /// Self-nesting elements (ChapterAtom, SimpleTag) map to their outermost
    /// position in the hierarchy.
    ///
    pub fn by_id(id: Id) -> Option<Ancestory> {
        const SEGMENT: &[Id] = &[Id::SEGMENT];
        const SEEK_HEAD: &[Id] = &[Id::SEGMENT, Id::SEEK_HEAD];
        const SEEK: &[Id] = &[Id::SEGMENT, Id::SEEK_HEAD, Id::SEEK];
        const INFO: &[Id] = &[Id::SEGMENT, Id::INFO];
        const CLUSTER: &[Id] = &[Id::SEGMENT, Id::CLUSTER];
        const BLOCK_GROUP: &[Id] = &[Id::SEGMENT, Id::CLUSTER, Id::BLOCK_GROUP];
        const TRACKS: &[Id] = &[Id::SEGMENT, Id::TRACKS];
        const TRACK_ENTRY: &[Id] = &[Id::SEGMENT, Id::TRACKS, Id::TRACK_ENTRY];
        const VIDEO: &[Id] = &[Id::SEGMENT, Id::TRACKS, Id::TRACK_ENTRY, Id::VIDEO];
        const AUDIO: &[Id] = &[Id::SEGMENT, Id::TRACKS, Id::TRACK_ENTRY, Id::AUDIO];
        const CUES: &[Id] = &[Id::SEGMENT, Id::CUES];
        const CUE_POINT: &[Id] = &[Id::SEGMENT, Id::CUES, Id::CUE_POINT];
        const CUE_TRACK_POSITIONS: &[Id] =
            &[Id::SEGMENT, Id::CUES, Id::CUE_POINT, Id::CUE_TRACK_POSITIONS];
        const CHAPTERS: &[Id] = &[Id::SEGMENT, Id::CHAPTERS];
        const EDITION_ENTRY: &[Id] = &[Id::SEGMENT, Id::CHAPTERS, Id::EDITION_ENTRY];
        const CHAPTER_ATOM: &[Id] =
            &[Id::SEGMENT, Id::CHAPTERS, Id::EDITION_ENTRY, Id::CHAPTER_ATOM];
        const CHAPTER_DISPLAY: &[Id] = &[
            Id::SEGMENT,
            Id::CHAPTERS,
            Id::EDITION_ENTRY,
            Id::CHAPTER_ATOM,
            Id::CHAPTER_DISPLAY,
        ];
        const TAGS: &[Id] = &[Id::SEGMENT, Id::TAGS];
        const TAG: &[Id] = &[Id::SEGMENT, Id::TAGS, Id::TAG];
        const TARGETS: &[Id] = &[Id::SEGMENT, Id::TAGS, Id::TAG, Id::TARGETS];
        const SIMPLE_TAG: &[Id] = &[Id::SEGMENT, Id::TAGS, Id::TAG, Id::SIMPLE_TAG];

        let ids: &[Id] = match id {
            Id::EBML | Id::SEGMENT | Id::VOID => &[],
            Id::SEEK_HEAD
            | Id::INFO
            | Id::CLUSTER
            | Id::TRACKS
            | Id::CUES
            | Id::CHAPTERS
            | Id::TAGS => SEGMENT,
            Id::SEEK => SEEK_HEAD,
            Id::SEEK_ID | Id::SEEK_POSITION => SEEK,
            Id::TIMECODE_SCALE
            | Id::DURATION
            | Id::DATE_UTC
            | Id::TITLE
            | Id::MUXING_APP
            | Id::WRITING_APP => INFO,
            Id::TIMECODE | Id::PREV_SIZE | Id::SIMPLE_BLOCK | Id::BLOCK_GROUP => CLUSTER,
            Id::BLOCK | Id::BLOCK_DURATION | Id::REFERENCE_BLOCK | Id::DISCARD_PADDING => {
                BLOCK_GROUP
            }
            Id::TRACK_ENTRY => TRACKS,
            Id::TRACK_NUMBER
            | Id::TRACK_UID
            | Id::TRACK_TYPE
            | Id::FLAG_ENABLED
            | Id::FLAG_DEFAULT
            | Id::FLAG_LACING
            | Id::DEFAULT_DURATION
            | Id::NAME
            | Id::LANGUAGE
            | Id::CODEC_ID
            | Id::CODEC_PRIVATE
            | Id::CODEC_NAME
            | Id::CODEC_DELAY
            | Id::SEEK_PRE_ROLL
            | Id::VIDEO
            | Id::AUDIO => TRACK_ENTRY,
            Id::PIXEL_WIDTH | Id::PIXEL_HEIGHT | Id::DISPLAY_WIDTH | Id::DISPLAY_HEIGHT => VIDEO,
            Id::SAMPLING_FREQUENCY | Id::CHANNELS | Id::BIT_DEPTH => AUDIO,
            Id::CUE_POINT => CUES,
            Id::CUE_TIME | Id::CUE_TRACK_POSITIONS => CUE_POINT,
            Id::CUE_TRACK
            | Id::CUE_CLUSTER_POSITION
            | Id::CUE_RELATIVE_POSITION
            | Id::CUE_BLOCK_NUMBER => CUE_TRACK_POSITIONS,
            Id::EDITION_ENTRY => CHAPTERS,
            Id::CHAPTER_ATOM => EDITION_ENTRY,
            Id::CHAPTER_UID
            | Id::CHAPTER_STRING_UID
            | Id::CHAPTER_TIME_START
            | Id::CHAPTER_TIME_END
            | Id::CHAPTER_DISPLAY => CHAPTER_ATOM,
            Id::CHAP_STRING | Id::CHAP_LANGUAGE | Id::CHAP_COUNTRY => CHAPTER_DISPLAY,
            Id::TAG => TAGS,
            Id::TARGETS | Id::SIMPLE_TAG => TAG,
            Id::TARGET_TYPE_VALUE | Id::TARGET_TYPE | Id::TAG_TRACK_UID => TARGETS,
            Id::TAG_NAME
            | Id::TAG_LANGUAGE
            | Id::TAG_DEFAULT
            | Id::TAG_STRING
            | Id::TAG_BINARY => SIMPLE_TAG,
            _ => return None,
        };
        Some(Ancestory {
            ids: ids.iter().copied().collect(),
        })
    }

    pub(crate) fn pop_front(&mut self) -> Option<Id> {
        self.ids.pop_front()
    }

    pub(crate) fn front(&self) -> Option<Id> {
        self.ids.front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    ReadingId,
    ReadingSize,
    Dispatching,
    FeedingChild,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveChild {
    None,
    Ebml,
    Segment,
    Void,
    Unknown,
    Skipped,
}

///
/// A parser for a complete WebM document.
///
/// Create one, then call [`feed`](WebmParser::feed) with a callback and a
/// reader until it returns `Ok(FeedStatus::Complete)`.  `Partial` means the
/// reader ran out of data for now; feed again when more arrives.  After
/// repositioning the reader to the start of an element, call
/// [`did_seek`](WebmParser::did_seek) before the next feed.
///
pub struct WebmParser {
    ebml_parser: MasterParser<Ebml>,
    segment_parser: MasterParser<()>,
    void_parser: VoidParser,
    unknown_parser: UnknownParser,
    skip_parser: SkipParser,
    skip_callback: SkipCallback,

    state: DriverState,
    active: ActiveChild,
    child_suppressed: bool,
    seek_pending: bool,
    id_parser: IdParser,
    id_in_progress: bool,
    size_parser: SizeParser,
    child_metadata: ElementMetadata,
    pending_metadata: Option<ElementMetadata>,
}

impl Default for WebmParser {
    fn default() -> Self {
        WebmParser::new()
    }
}

impl WebmParser {
    pub fn new() -> Self {
        WebmParser {
            ebml_parser: ebml_parser(),
            segment_parser: segment_parser(),
            void_parser: VoidParser::default(),
            unknown_parser: UnknownParser::default(),
            skip_parser: SkipParser::default(),
            skip_callback: SkipCallback,
            state: DriverState::ReadingId,
            active: ActiveChild::None,
            child_suppressed: false,
            seek_pending: false,
            id_parser: IdParser::default(),
            id_in_progress: false,
            size_parser: SizeParser::default(),
            child_metadata: ElementMetadata::default(),
            pending_metadata: None,
        }
    }

    ///
    /// Resets parsing state after the reader has been repositioned to the
    /// first byte of an element header.  Whatever element was in progress
    /// is abandoned; parsing resumes at the new position on the next
    /// [`feed`](WebmParser::feed), restarting the enclosing masters without
    /// replaying their begin events.
    ///
    pub fn did_seek(&mut self) {
        debug!("restarting parse at a new reader position");
        self.state = DriverState::ReadingId;
        self.active = ActiveChild::None;
        self.child_suppressed = false;
        self.seek_pending = true;
        self.id_parser = IdParser::default();
        self.id_in_progress = false;
        self.size_parser = SizeParser::default();
        self.pending_metadata = None;
    }

    ///
    /// Parses as much of the stream as the reader can currently supply.
    ///
    pub fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
    ) -> ParseResult<FeedStatus> {
        loop {
            match self.state {
                DriverState::ReadingId => {
                    if let Some(pending) = self.pending_metadata.take() {
                        self.child_metadata = pending;
                        self.state = DriverState::Dispatching;
                        continue;
                    }
                    let mut count = 0;
                    let result = self.id_parser.feed(reader, &mut count);
                    if count > 0 {
                        self.id_in_progress = true;
                    }
                    match result {
                        Ok(FeedStatus::Complete) => self.state = DriverState::ReadingSize,
                        Ok(FeedStatus::Partial) => return Ok(FeedStatus::Partial),
                        Err(ParseError::EndOfFile) if !self.id_in_progress => {
                            // Clean end of stream between top-level elements.
                            self.state = DriverState::Done;
                            return Ok(FeedStatus::Complete);
                        }
                        Err(error) => return Err(error),
                    }
                }

                DriverState::ReadingSize => {
                    let mut count = 0;
                    match self.size_parser.feed(reader, &mut count)? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            let id = self.id_parser.id();
                            let header_size =
                                id.encoded_length() + self.size_parser.encoded_length();
                            self.child_metadata = ElementMetadata {
                                id,
                                header_size,
                                size: self.size_parser.size(),
                                position: reader.position() - u64::from(header_size),
                            };
                            self.id_parser = IdParser::default();
                            self.id_in_progress = false;
                            self.size_parser = SizeParser::default();

                            if self.seek_pending {
                                self.seek_pending = false;
                                if self.route_seek()? {
                                    continue;
                                }
                            }
                            self.state = DriverState::Dispatching;
                        }
                    }
                }

                DriverState::Dispatching => {
                    let child = self.child_metadata;
                    let action = callback.on_element_begin(&child)?;
                    self.dispatch(child, action)?;
                    self.state = DriverState::FeedingChild;
                }

                DriverState::FeedingChild => {
                    let mut count = 0;
                    let status = {
                        let cb: &mut dyn Callback = if self.child_suppressed {
                            &mut self.skip_callback
                        } else {
                            callback
                        };
                        match self.active {
                            ActiveChild::Ebml => self.ebml_parser.feed(cb, reader, &mut count),
                            ActiveChild::Segment => {
                                self.segment_parser.feed(cb, reader, &mut count)
                            }
                            ActiveChild::Void => self.void_parser.feed(cb, reader, &mut count),
                            ActiveChild::Unknown => {
                                self.unknown_parser.feed(cb, reader, &mut count)
                            }
                            ActiveChild::Skipped => self.skip_parser.feed(cb, reader, &mut count),
                            ActiveChild::None => unreachable!("no active element"),
                        }
                    };
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            if self.active == ActiveChild::Segment {
                                self.pending_metadata = self.segment_parser.cached_metadata();
                            }
                            self.active = ActiveChild::None;
                            self.child_suppressed = false;
                            self.state = DriverState::ReadingId;
                        }
                    }
                }

                DriverState::Done => return Ok(FeedStatus::Complete),
            }
        }
    }

    ///
    /// Routes the freshly decoded post-seek header into the Segment parser
    /// when it belongs somewhere below the top level.  Returns true if the
    /// routing consumed the header.
    ///
    fn route_seek(&mut self) -> ParseResult<bool> {
        let child = self.child_metadata;
        match Ancestory::by_id(child.id) {
            Some(ancestory) if !ancestory.is_empty() => {
                self.segment_parser.init_after_seek(ancestory, child);
                self.active = ActiveChild::Segment;
                self.child_suppressed = false;
                self.state = DriverState::FeedingChild;
                Ok(true)
            }
            // Top-level or unrecognized: dispatch normally.
            _ => Ok(false),
        }
    }

    fn dispatch(&mut self, child: ElementMetadata, action: Action) -> ParseResult<()> {
        trace!("top-level element {} at {}", child.id, child.position);
        if action == Action::Skip && !child.has_unknown_size() {
            self.skip_parser.init(&child, u64::MAX)?;
            self.active = ActiveChild::Skipped;
            return Ok(());
        }
        self.child_suppressed = action == Action::Skip;
        match child.id {
            Id::EBML => {
                self.ebml_parser.init(&child, u64::MAX)?;
                self.active = ActiveChild::Ebml;
            }
            Id::SEGMENT => {
                self.segment_parser.init(&child, u64::MAX)?;
                self.active = ActiveChild::Segment;
            }
            Id::VOID => {
                self.void_parser.init(&child, u64::MAX)?;
                self.active = ActiveChild::Void;
            }
            _ => {
                self.unknown_parser.init(&child, u64::MAX)?;
                self.active = ActiveChild::Unknown;
            }
        }
        Ok(())
    }
}

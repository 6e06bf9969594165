//!
//! Shared helpers for the integration tests: encoders that assemble WebM
//! streams element by element, a reader that serves data in fixed chunks,
//! and a callback that records every event it observes.
//!

#![allow(dead_code)]

use webm_incremental::{
    Action, Block, BlockGroup, BufferReader, Callback, Cluster, CuePoint, Ebml, ElementMetadata,
    FeedStatus, FrameMetadata, Id, Info, ParseError, ParseResult, Reader, Seek, SimpleBlock, Tag,
    TrackEntry, Vint, WebmParser,
};

/// The encoded bytes of an element ID, marker bits included.
pub fn encoded_id(id: Id) -> Vec<u8> {
    let bytes = id.value().to_be_bytes();
    bytes[8 - id.encoded_length() as usize..].to_vec()
}

/// An element with its size encoded in the fewest bytes possible.
pub fn element(id: Id, body: &[u8]) -> Vec<u8> {
    let mut out = encoded_id(id);
    out.extend((body.len() as u64).as_vint().expect("size fits in a vint"));
    out.extend_from_slice(body);
    out
}

/// An element whose header declares no size.
pub fn unknown_size_element(id: Id, body: &[u8]) -> Vec<u8> {
    let mut out = encoded_id(id);
    out.extend(webm_incremental::unknown_size_vint(1));
    out.extend_from_slice(body);
    out
}

/// An unsigned integer element, big-endian, minimal width.
pub fn uint(id: Id, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    element(id, &bytes[first..])
}

/// A signed integer element, two's complement, minimal width.
pub fn sint(id: Id, value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    element(id, &bytes[start..])
}

/// A UTF-8 string element.
pub fn string(id: Id, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

///
/// A [`Reader`] that serves its data in fixed chunks, reporting "no data
/// yet" (a zero-byte read) once at every chunk boundary.  This simulates a
/// slow incremental source and forces the parser through its
/// suspend/resume paths.
///
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    served_in_chunk: usize,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0);
        ChunkedReader {
            data,
            pos: 0,
            chunk_size,
            served_in_chunk: 0,
        }
    }
}

impl Reader for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> ParseResult<usize> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        if self.served_in_chunk == self.chunk_size {
            self.served_in_chunk = 0;
            return Ok(0);
        }
        let available = (self.chunk_size - self.served_in_chunk).min(self.data.len() - self.pos);
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&self.data[self.pos..self.pos + count]);
        self.pos += count;
        self.served_in_chunk += count;
        Ok(count)
    }

    fn skip(&mut self, num_to_skip: u64) -> ParseResult<u64> {
        if self.pos >= self.data.len() {
            return Err(ParseError::EndOfFile);
        }
        if self.served_in_chunk == self.chunk_size {
            self.served_in_chunk = 0;
            return Ok(0);
        }
        let available = (self.chunk_size - self.served_in_chunk).min(self.data.len() - self.pos);
        let count = (num_to_skip as usize).min(available);
        self.pos += count;
        self.served_in_chunk += count;
        Ok(count as u64)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

/// One observed callback event, reduced to the fields the tests compare.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Ebml { doc_type: String },
    SegmentBegin,
    Seek { target: Id, position: u64 },
    Info { timecode_scale: u64, muxing_app: String },
    TrackEntry { number: u64, codec: String },
    ClusterBegin { timecode: u64 },
    SimpleBlockBegin { track: u64, is_key_frame: bool },
    BlockGroupBegin,
    BlockBegin { track: u64, timecode: i16 },
    Frame(Vec<u8>),
    BlockGroupEnd { references: Vec<i64> },
    ClusterEnd { simple_blocks: usize, block_groups: usize },
    CuePoint { time: u64 },
    Tag { name: String },
    Unknown { id: Id, size: u64 },
    Void { size: u64 },
}

///
/// A [`Callback`] that records every event in order, so runs over different
/// readers (or resumed at different points) can be compared wholesale.
///
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<Event>,
    pub skip_segment: bool,
    pub skip_clusters: bool,
    pub frame: Vec<u8>,
}

impl Callback for EventLog {
    fn on_ebml(&mut self, _metadata: &ElementMetadata, ebml: &Ebml) -> ParseResult<()> {
        self.events.push(Event::Ebml {
            doc_type: ebml.doc_type.value.clone(),
        });
        Ok(())
    }

    fn on_segment_begin(&mut self, _metadata: &ElementMetadata) -> ParseResult<Action> {
        if self.skip_segment {
            return Ok(Action::Skip);
        }
        self.events.push(Event::SegmentBegin);
        Ok(Action::Read)
    }

    fn on_seek(&mut self, _metadata: &ElementMetadata, seek: &Seek) -> ParseResult<()> {
        self.events.push(Event::Seek {
            target: seek.id.value,
            position: seek.position.value,
        });
        Ok(())
    }

    fn on_info(&mut self, _metadata: &ElementMetadata, info: &Info) -> ParseResult<()> {
        self.events.push(Event::Info {
            timecode_scale: info.timecode_scale.value,
            muxing_app: info.muxing_app.value.clone(),
        });
        Ok(())
    }

    fn on_track_entry(
        &mut self,
        _metadata: &ElementMetadata,
        track_entry: &TrackEntry,
    ) -> ParseResult<()> {
        self.events.push(Event::TrackEntry {
            number: track_entry.track_number.value,
            codec: track_entry.codec_id.value.clone(),
        });
        Ok(())
    }

    fn on_cluster_begin(
        &mut self,
        _metadata: &ElementMetadata,
        cluster: &Cluster,
    ) -> ParseResult<Action> {
        self.events.push(Event::ClusterBegin {
            timecode: cluster.timecode.value,
        });
        Ok(if self.skip_clusters {
            Action::Skip
        } else {
            Action::Read
        })
    }

    fn on_simple_block_begin(
        &mut self,
        _metadata: &ElementMetadata,
        simple_block: &SimpleBlock,
    ) -> ParseResult<Action> {
        self.events.push(Event::SimpleBlockBegin {
            track: simple_block.track_number,
            is_key_frame: simple_block.is_key_frame,
        });
        Ok(Action::Read)
    }

    fn on_block_group_begin(&mut self, _metadata: &ElementMetadata) -> ParseResult<Action> {
        self.events.push(Event::BlockGroupBegin);
        Ok(Action::Read)
    }

    fn on_block_begin(
        &mut self,
        _metadata: &ElementMetadata,
        block: &Block,
    ) -> ParseResult<Action> {
        self.events.push(Event::BlockBegin {
            track: block.track_number,
            timecode: block.timecode,
        });
        Ok(Action::Read)
    }

    fn on_frame(
        &mut self,
        _metadata: &FrameMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        while *bytes_remaining > 0 {
            let mut buf = vec![0u8; *bytes_remaining as usize];
            let count = reader.read(&mut buf)?;
            if count == 0 {
                return Ok(FeedStatus::Partial);
            }
            self.frame.extend_from_slice(&buf[..count]);
            *bytes_remaining -= count as u64;
        }
        self.events.push(Event::Frame(std::mem::take(&mut self.frame)));
        Ok(FeedStatus::Complete)
    }

    fn on_block_group_end(
        &mut self,
        _metadata: &ElementMetadata,
        block_group: &BlockGroup,
    ) -> ParseResult<()> {
        self.events.push(Event::BlockGroupEnd {
            references: block_group
                .references
                .iter()
                .map(|reference| reference.value)
                .collect(),
        });
        Ok(())
    }

    fn on_cluster_end(&mut self, _metadata: &ElementMetadata, cluster: &Cluster) -> ParseResult<()> {
        self.events.push(Event::ClusterEnd {
            simple_blocks: cluster.simple_blocks.len(),
            block_groups: cluster.block_groups.len(),
        });
        Ok(())
    }

    fn on_cue_point(&mut self, _metadata: &ElementMetadata, cue_point: &CuePoint) -> ParseResult<()> {
        self.events.push(Event::CuePoint {
            time: cue_point.time.value,
        });
        Ok(())
    }

    fn on_tag(&mut self, _metadata: &ElementMetadata, tag: &Tag) -> ParseResult<()> {
        self.events.push(Event::Tag {
            name: tag
                .tags
                .first()
                .map(|simple| simple.value.name.value.clone())
                .unwrap_or_default(),
        });
        Ok(())
    }

    fn on_unknown_element(
        &mut self,
        metadata: &ElementMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        while *bytes_remaining > 0 {
            let skipped = reader.skip(*bytes_remaining)?;
            if skipped == 0 {
                return Ok(FeedStatus::Partial);
            }
            *bytes_remaining -= skipped;
        }
        self.events.push(Event::Unknown {
            id: metadata.id,
            size: metadata.size,
        });
        Ok(FeedStatus::Complete)
    }

    fn on_void(
        &mut self,
        metadata: &ElementMetadata,
        reader: &mut dyn Reader,
        bytes_remaining: &mut u64,
    ) -> ParseResult<FeedStatus> {
        while *bytes_remaining > 0 {
            let skipped = reader.skip(*bytes_remaining)?;
            if skipped == 0 {
                return Ok(FeedStatus::Partial);
            }
            *bytes_remaining -= skipped;
        }
        self.events.push(Event::Void {
            size: metadata.size,
        });
        Ok(FeedStatus::Complete)
    }
}

pub const SIMPLE_BLOCK_FRAME: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];
pub const GROUP_BLOCK_FRAME: &[u8] = &[0x99, 0x88];

/// A complete document plus the byte offsets the seek tests need.
pub struct SampleDocument {
    pub data: Vec<u8>,
    pub segment_offset: usize,
    pub timecode_scale_offset: usize,
    pub first_track_offset: usize,
    pub video_offset: usize,
    pub cluster_offset: usize,
}

///
/// An EBML header and a Segment holding a SeekHead, Info, two tracks, one
/// cluster with a SimpleBlock and a BlockGroup, Cues, and Tags.
///
pub fn sample_document() -> SampleDocument {
    let ebml = element(
        Id::EBML,
        &[string(Id::DOC_TYPE, "webm"), uint(Id::DOC_TYPE_VERSION, 2)].concat(),
    );

    let seek_body = [
        element(Id::SEEK_ID, &encoded_id(Id::CUES)),
        uint(Id::SEEK_POSITION, 4096),
    ]
    .concat();
    let seek_head = element(Id::SEEK_HEAD, &element(Id::SEEK, &seek_body));

    let info_body = [
        uint(Id::TIMECODE_SCALE, 1_000_000),
        string(Id::MUXING_APP, "mux"),
        string(Id::WRITING_APP, "writ"),
    ]
    .concat();
    let info = element(Id::INFO, &info_body);

    let video = element(
        Id::VIDEO,
        &[uint(Id::PIXEL_WIDTH, 640), uint(Id::PIXEL_HEIGHT, 360)].concat(),
    );
    let track1_scalars = [
        uint(Id::TRACK_NUMBER, 1),
        uint(Id::TRACK_UID, 0xAB),
        uint(Id::TRACK_TYPE, 1),
        string(Id::CODEC_ID, "V_VP9"),
    ]
    .concat();
    let track1_body = [track1_scalars.clone(), video].concat();
    let track1 = element(Id::TRACK_ENTRY, &track1_body);
    let track1_header = track1.len() - track1_body.len();
    let audio = element(Id::AUDIO, &uint(Id::CHANNELS, 2));
    let track2 = element(
        Id::TRACK_ENTRY,
        &[
            uint(Id::TRACK_NUMBER, 2),
            uint(Id::TRACK_TYPE, 2),
            string(Id::CODEC_ID, "A_OPUS"),
            audio,
        ]
        .concat(),
    );
    let tracks_body = [track1, track2].concat();
    let tracks = element(Id::TRACKS, &tracks_body);

    // Track 1, relative timecode 0, key frame, one unlaced frame.
    let simple_block = element(
        Id::SIMPLE_BLOCK,
        &[&[0x81, 0x00, 0x00, 0x80][..], SIMPLE_BLOCK_FRAME].concat(),
    );
    // Track 2, relative timecode 10, no flags.
    let block = element(
        Id::BLOCK,
        &[&[0x82, 0x00, 0x0A, 0x00][..], GROUP_BLOCK_FRAME].concat(),
    );
    let block_group = element(
        Id::BLOCK_GROUP,
        &[block, sint(Id::REFERENCE_BLOCK, -5)].concat(),
    );
    let cluster = element(
        Id::CLUSTER,
        &[uint(Id::TIMECODE, 0), simple_block, block_group].concat(),
    );

    let positions = element(
        Id::CUE_TRACK_POSITIONS,
        &[uint(Id::CUE_TRACK, 1), uint(Id::CUE_CLUSTER_POSITION, 64)].concat(),
    );
    let cues = element(
        Id::CUES,
        &element(Id::CUE_POINT, &[uint(Id::CUE_TIME, 0), positions].concat()),
    );

    let targets = element(Id::TARGETS, &uint(Id::TARGET_TYPE_VALUE, 30));
    let simple_tag = element(
        Id::SIMPLE_TAG,
        &[string(Id::TAG_NAME, "TITLE"), string(Id::TAG_STRING, "x")].concat(),
    );
    let tags = element(
        Id::TAGS,
        &element(Id::TAG, &[targets, simple_tag].concat()),
    );

    let segment_body = [
        seek_head.clone(),
        info.clone(),
        tracks.clone(),
        cluster,
        cues,
        tags,
    ]
    .concat();
    let segment = element(Id::SEGMENT, &segment_body);
    let segment_header = segment.len() - segment_body.len();

    let segment_offset = ebml.len();
    let base = ebml.len() + segment_header;
    let info_header = info.len() - info_body.len();
    let timecode_scale_offset = base + seek_head.len() + info_header;
    let tracks_offset = base + seek_head.len() + info.len();
    let first_track_offset = tracks_offset + (tracks.len() - tracks_body.len());
    let video_offset = first_track_offset + track1_header + track1_scalars.len();
    let cluster_offset = tracks_offset + tracks.len();

    SampleDocument {
        data: [ebml, segment].concat(),
        segment_offset,
        timecode_scale_offset,
        first_track_offset,
        video_offset,
        cluster_offset,
    }
}

/// Every event the sample document produces, in order.
pub fn full_event_sequence() -> Vec<Event> {
    vec![
        Event::Ebml {
            doc_type: "webm".to_owned(),
        },
        Event::SegmentBegin,
        Event::Seek {
            target: Id::CUES,
            position: 4096,
        },
        Event::Info {
            timecode_scale: 1_000_000,
            muxing_app: "mux".to_owned(),
        },
        Event::TrackEntry {
            number: 1,
            codec: "V_VP9".to_owned(),
        },
        Event::TrackEntry {
            number: 2,
            codec: "A_OPUS".to_owned(),
        },
        Event::ClusterBegin { timecode: 0 },
        Event::SimpleBlockBegin {
            track: 1,
            is_key_frame: true,
        },
        Event::Frame(SIMPLE_BLOCK_FRAME.to_vec()),
        Event::BlockGroupBegin,
        Event::BlockBegin {
            track: 2,
            timecode: 10,
        },
        Event::Frame(GROUP_BLOCK_FRAME.to_vec()),
        Event::BlockGroupEnd {
            references: vec![-5],
        },
        Event::ClusterEnd {
            simple_blocks: 1,
            block_groups: 1,
        },
        Event::CuePoint { time: 0 },
        Event::Tag {
            name: "TITLE".to_owned(),
        },
    ]
}

/// Parses the whole stream in one feed over a buffer reader.
pub fn parse_all(data: &[u8]) -> Vec<Event> {
    let mut parser = WebmParser::new();
    let mut log = EventLog::default();
    let mut reader = BufferReader::new(data.to_vec());
    assert!(parser.feed(&mut log, &mut reader).unwrap().is_complete());
    log.events
}

/// Parses the whole stream through a chunked reader, resuming after every
/// stall, and returns the events observed.
pub fn parse_chunked(data: &[u8], chunk_size: usize) -> Vec<Event> {
    let mut parser = WebmParser::new();
    let mut log = EventLog::default();
    let mut reader = ChunkedReader::new(data.to_vec(), chunk_size);
    while !parser.feed(&mut log, &mut reader).unwrap().is_complete() {}
    log.events
}

//!
//! Parsers for Block and SimpleBlock elements.
//!
//! A block's payload starts with a small binary header (track number as a
//! varint, a 16-bit relative timecode, a flags byte), optionally followed
//! by lacing information describing how multiple frames are packed into the
//! remaining bytes.  Frame payloads are never buffered; each one is
//! streamed to [`Callback::on_frame`] as it is reached.
//!
//! [`Callback::on_frame`]: crate::Callback::on_frame
//!

use crate::callback::{Action, Callback, FrameMetadata};
use crate::dom_types::{Block, Lacing, SimpleBlock};
use crate::element::ElementMetadata;
use crate::errors::{ParseError, ParseResult};
use crate::parser::{read_byte, ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;
use crate::vint::VarIntParser;

///
/// The fixed part of a block payload, before any lacing data.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub track_number: u64,
    pub timecode: i16,
    pub flags: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    ReadingTrackNumber,
    ReadingTimecode,
    ReadingFlags,
    Done,
}

///
/// A resumable decoder for the fixed block header.
///
#[derive(Debug)]
pub struct BlockHeaderParser {
    value: BlockHeader,
    uint_parser: VarIntParser,
    timecode_bytes_remaining: u32,
    state: HeaderState,
}

impl Default for BlockHeaderParser {
    fn default() -> Self {
        BlockHeaderParser {
            value: BlockHeader::default(),
            uint_parser: VarIntParser::default(),
            timecode_bytes_remaining: 2,
            state: HeaderState::ReadingTrackNumber,
        }
    }
}

impl BlockHeaderParser {
    pub fn feed(&mut self, reader: &mut dyn Reader, bytes_read: &mut u64) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        loop {
            match self.state {
                HeaderState::ReadingTrackNumber => {
                    let mut count = 0;
                    let status = self.uint_parser.feed(reader, &mut count);
                    *bytes_read += count;
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            self.value.track_number = self.uint_parser.value();
                            self.state = HeaderState::ReadingTimecode;
                        }
                    }
                }
                HeaderState::ReadingTimecode => {
                    while self.timecode_bytes_remaining > 0 {
                        let byte = match read_byte(reader)? {
                            Some(byte) => byte,
                            None => return Ok(FeedStatus::Partial),
                        };
                        *bytes_read += 1;
                        self.value.timecode = self.value.timecode << 8 | i16::from(byte);
                        self.timecode_bytes_remaining -= 1;
                    }
                    self.state = HeaderState::ReadingFlags;
                }
                HeaderState::ReadingFlags => {
                    let byte = match read_byte(reader)? {
                        Some(byte) => byte,
                        None => return Ok(FeedStatus::Partial),
                    };
                    *bytes_read += 1;
                    self.value.flags = byte;
                    self.state = HeaderState::Done;
                }
                HeaderState::Done => return Ok(FeedStatus::Complete),
            }
        }
    }

    ///
    /// The parsed header.  Must not be called until the parse has completed.
    ///
    pub fn value(&self) -> &BlockHeader {
        debug_assert_eq!(self.state, HeaderState::Done);
        &self.value
    }
}

const FLAG_KEY_FRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_LACING: u8 = 0x06;
const FLAG_DISCARDABLE: u8 = 0x01;

fn lacing_from_flags(flags: u8) -> Lacing {
    match flags & FLAG_LACING {
        0x02 => Lacing::Xiph,
        0x04 => Lacing::Fixed,
        0x06 => Lacing::Ebml,
        _ => Lacing::None,
    }
}

///
/// The piece that differs between Block and SimpleBlock: how header bits
/// map into the value, and which begin event announces it.
///
pub trait BlockValue: Default {
    fn from_header(header: &BlockHeader, lacing: Lacing, num_frames: usize) -> Self;

    fn begin(
        callback: &mut dyn Callback,
        metadata: &ElementMetadata,
        value: &Self,
    ) -> ParseResult<Action>;
}

impl BlockValue for Block {
    fn from_header(header: &BlockHeader, lacing: Lacing, num_frames: usize) -> Self {
        Block {
            track_number: header.track_number,
            timecode: header.timecode,
            num_frames,
            lacing,
            is_visible: header.flags & FLAG_INVISIBLE == 0,
        }
    }

    fn begin(
        callback: &mut dyn Callback,
        metadata: &ElementMetadata,
        value: &Self,
    ) -> ParseResult<Action> {
        callback.on_block_begin(metadata, value)
    }
}

impl BlockValue for SimpleBlock {
    fn from_header(header: &BlockHeader, lacing: Lacing, num_frames: usize) -> Self {
        SimpleBlock {
            track_number: header.track_number,
            timecode: header.timecode,
            num_frames,
            lacing,
            is_visible: header.flags & FLAG_INVISIBLE == 0,
            is_key_frame: header.flags & FLAG_KEY_FRAME != 0,
            is_discardable: header.flags & FLAG_DISCARDABLE != 0,
        }
    }

    fn begin(
        callback: &mut dyn Callback,
        metadata: &ElementMetadata,
        value: &Self,
    ) -> ParseResult<Action> {
        callback.on_simple_block_begin(metadata, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    ReadingHeader,
    ReadingLaceCount,
    ReadingXiphSizes,
    ReadingFirstEbmlSize,
    ReadingEbmlDeltas,
    GettingAction,
    BeginningFrame,
    ReadingFrame,
    Skipping,
    Done,
}

///
/// Parses a Block or SimpleBlock body, streaming frames to the callback.
///
pub struct BasicBlockParser<B: BlockValue> {
    metadata: ElementMetadata,
    header_parser: BlockHeaderParser,
    uint_parser: VarIntParser,
    state: BlockState,
    value: B,
    lacing: Lacing,
    num_frames: usize,
    /// Explicit sizes for the first `num_frames - 1` frames; the last frame
    /// takes whatever remains.  Fixed lacing fills all entries up front.
    lace_sizes: Vec<u64>,
    xiph_accumulator: u64,
    body_remaining: u64,
    frame_index: usize,
    frame_metadata: FrameMetadata,
    frame_remaining: u64,
}

impl<B: BlockValue> Default for BasicBlockParser<B> {
    fn default() -> Self {
        BasicBlockParser {
            metadata: ElementMetadata::default(),
            header_parser: BlockHeaderParser::default(),
            uint_parser: VarIntParser::default(),
            state: BlockState::Done,
            value: B::default(),
            lacing: Lacing::None,
            num_frames: 0,
            lace_sizes: Vec::new(),
            xiph_accumulator: 0,
            body_remaining: 0,
            frame_index: 0,
            frame_metadata: FrameMetadata {
                parent: ElementMetadata::default(),
                position: 0,
                size: 0,
            },
            frame_remaining: 0,
        }
    }
}

impl<B: BlockValue> BasicBlockParser<B> {
    fn invalid(&self) -> ParseError {
        ParseError::InvalidElementValue {
            position: self.metadata.position,
        }
    }

    ///
    /// Converts explicit lace sizes into the full frame-size list, deriving
    /// the final frame from the unclaimed remainder.
    ///
    fn finalize_lace_sizes(&mut self) -> ParseResult<()> {
        if self.lacing != Lacing::Fixed {
            let claimed: u64 = self.lace_sizes.iter().sum();
            if claimed > self.body_remaining {
                return Err(self.invalid());
            }
            self.lace_sizes.push(self.body_remaining - claimed);
        }
        Ok(())
    }
}

impl<B: BlockValue> ElementParser for BasicBlockParser<B> {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if metadata.has_unknown_size() || metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.metadata = *metadata;
        self.header_parser = BlockHeaderParser::default();
        self.uint_parser = VarIntParser::default();
        self.state = BlockState::ReadingHeader;
        self.value = B::default();
        self.lacing = Lacing::None;
        self.num_frames = 0;
        self.lace_sizes.clear();
        self.xiph_accumulator = 0;
        self.body_remaining = metadata.size;
        self.frame_index = 0;
        self.frame_remaining = 0;
        Ok(())
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        loop {
            match self.state {
                BlockState::ReadingHeader => {
                    let mut count = 0;
                    let status = self.header_parser.feed(reader, &mut count);
                    *bytes_read += count;
                    self.body_remaining = self
                        .body_remaining
                        .checked_sub(count)
                        .ok_or_else(|| self.invalid())?;
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            self.lacing = lacing_from_flags(self.header_parser.value().flags);
                            if self.lacing == Lacing::None {
                                self.num_frames = 1;
                                self.state = BlockState::GettingAction;
                            } else {
                                self.state = BlockState::ReadingLaceCount;
                            }
                        }
                    }
                }

                BlockState::ReadingLaceCount => {
                    let byte = match read_byte(reader)? {
                        Some(byte) => byte,
                        None => return Ok(FeedStatus::Partial),
                    };
                    *bytes_read += 1;
                    self.body_remaining =
                        self.body_remaining.checked_sub(1).ok_or_else(|| self.invalid())?;
                    self.num_frames = usize::from(byte) + 1;
                    self.state = match self.lacing {
                        Lacing::Xiph if self.num_frames > 1 => BlockState::ReadingXiphSizes,
                        Lacing::Ebml if self.num_frames > 1 => BlockState::ReadingFirstEbmlSize,
                        Lacing::Fixed => {
                            if self.body_remaining % self.num_frames as u64 != 0 {
                                return Err(self.invalid());
                            }
                            let each = self.body_remaining / self.num_frames as u64;
                            self.lace_sizes = vec![each; self.num_frames];
                            BlockState::GettingAction
                        }
                        _ => BlockState::GettingAction,
                    };
                }

                BlockState::ReadingXiphSizes => {
                    while self.lace_sizes.len() < self.num_frames - 1 {
                        let byte = match read_byte(reader)? {
                            Some(byte) => byte,
                            None => return Ok(FeedStatus::Partial),
                        };
                        *bytes_read += 1;
                        self.body_remaining =
                            self.body_remaining.checked_sub(1).ok_or_else(|| self.invalid())?;
                        self.xiph_accumulator += u64::from(byte);
                        if byte != 255 {
                            self.lace_sizes.push(self.xiph_accumulator);
                            self.xiph_accumulator = 0;
                        }
                    }
                    self.state = BlockState::GettingAction;
                }

                BlockState::ReadingFirstEbmlSize => {
                    let mut count = 0;
                    let status = self.uint_parser.feed(reader, &mut count);
                    *bytes_read += count;
                    self.body_remaining = self
                        .body_remaining
                        .checked_sub(count)
                        .ok_or_else(|| self.invalid())?;
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            self.lace_sizes.push(self.uint_parser.value());
                            self.uint_parser = VarIntParser::default();
                            self.state = if self.num_frames > 2 {
                                BlockState::ReadingEbmlDeltas
                            } else {
                                BlockState::GettingAction
                            };
                        }
                    }
                }

                BlockState::ReadingEbmlDeltas => {
                    while self.lace_sizes.len() < self.num_frames - 1 {
                        let mut count = 0;
                        let status = self.uint_parser.feed(reader, &mut count);
                        *bytes_read += count;
                        self.body_remaining = self
                            .body_remaining
                            .checked_sub(count)
                            .ok_or_else(|| self.invalid())?;
                        match status? {
                            FeedStatus::Partial => return Ok(FeedStatus::Partial),
                            FeedStatus::Complete => {
                                // Deltas are signed vints: the encoded value
                                // is offset by half the representable range.
                                let bias =
                                    (1i64 << (7 * self.uint_parser.encoded_length() - 1)) - 1;
                                let delta = self.uint_parser.value() as i64 - bias;
                                self.uint_parser = VarIntParser::default();
                                let previous = *self
                                    .lace_sizes
                                    .last()
                                    .unwrap_or_else(|| unreachable!("first size parsed above"));
                                let next = previous as i64 + delta;
                                if next < 0 {
                                    return Err(self.invalid());
                                }
                                self.lace_sizes.push(next as u64);
                            }
                        }
                    }
                    self.state = BlockState::GettingAction;
                }

                BlockState::GettingAction => {
                    self.finalize_lace_sizes()?;
                    self.value =
                        B::from_header(self.header_parser.value(), self.lacing, self.num_frames);
                    let action = B::begin(callback, &self.metadata, &self.value)?;
                    self.state = if action == Action::Skip {
                        BlockState::Skipping
                    } else {
                        BlockState::BeginningFrame
                    };
                }

                BlockState::BeginningFrame => {
                    if self.frame_index == self.num_frames {
                        if self.body_remaining != 0 {
                            return Err(self.invalid());
                        }
                        self.state = BlockState::Done;
                        continue;
                    }
                    let size = self.lace_sizes[self.frame_index];
                    self.frame_metadata = FrameMetadata {
                        parent: self.metadata,
                        position: reader.position(),
                        size,
                    };
                    self.frame_remaining = size;
                    self.state = BlockState::ReadingFrame;
                }

                BlockState::ReadingFrame => {
                    let before = self.frame_remaining;
                    let result =
                        callback.on_frame(&self.frame_metadata, reader, &mut self.frame_remaining);
                    let consumed = before - self.frame_remaining;
                    *bytes_read += consumed;
                    self.body_remaining = self
                        .body_remaining
                        .checked_sub(consumed)
                        .ok_or_else(|| self.invalid())?;
                    match result? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            self.frame_index += 1;
                            self.state = BlockState::BeginningFrame;
                        }
                    }
                }

                BlockState::Skipping => {
                    while self.body_remaining > 0 {
                        let skipped = reader.skip(self.body_remaining)?;
                        if skipped == 0 {
                            return Ok(FeedStatus::Partial);
                        }
                        *bytes_read += skipped;
                        self.body_remaining -= skipped;
                    }
                    self.state = BlockState::Done;
                }

                BlockState::Done => return Ok(FeedStatus::Complete),
            }
        }
    }
}

impl<B: BlockValue> ValueParser for BasicBlockParser<B> {
    type Value = B;

    fn value(&self) -> &B {
        &self.value
    }

    fn take_value(&mut self) -> B {
        std::mem::take(&mut self.value)
    }
}

/// Parser for Block elements.
pub type BlockParser = BasicBlockParser<Block>;
/// Parser for SimpleBlock elements.
pub type SimpleBlockParser = BasicBlockParser<SimpleBlock>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Id;
    use crate::reader::BufferReader;
    use crate::test_utils::ChunkedReader;

    #[derive(Default)]
    struct FrameRecorder {
        begins: Vec<SimpleBlock>,
        block_begins: Vec<Block>,
        frames: Vec<Vec<u8>>,
        frame_in_progress: bool,
        skip_blocks: bool,
    }

    impl Callback for FrameRecorder {
        fn on_simple_block_begin(
            &mut self,
            _metadata: &ElementMetadata,
            simple_block: &SimpleBlock,
        ) -> ParseResult<Action> {
            self.begins.push(*simple_block);
            Ok(if self.skip_blocks {
                Action::Skip
            } else {
                Action::Read
            })
        }

        fn on_block_begin(
            &mut self,
            _metadata: &ElementMetadata,
            block: &Block,
        ) -> ParseResult<Action> {
            self.block_begins.push(*block);
            Ok(Action::Read)
        }

        fn on_frame(
            &mut self,
            _metadata: &FrameMetadata,
            reader: &mut dyn Reader,
            bytes_remaining: &mut u64,
        ) -> ParseResult<FeedStatus> {
            if !self.frame_in_progress {
                self.frames.push(Vec::new());
                self.frame_in_progress = true;
            }
            let current = match self.frames.last_mut() {
                Some(current) => current,
                None => unreachable!(),
            };
            while *bytes_remaining > 0 {
                let mut buf = vec![0u8; *bytes_remaining as usize];
                let count = reader.read(&mut buf)?;
                if count == 0 {
                    return Ok(FeedStatus::Partial);
                }
                current.extend_from_slice(&buf[..count]);
                *bytes_remaining -= count as u64;
            }
            self.frame_in_progress = false;
            Ok(FeedStatus::Complete)
        }
    }

    fn metadata(size: u64) -> ElementMetadata {
        ElementMetadata {
            id: Id::SIMPLE_BLOCK,
            header_size: 2,
            size,
            position: 0,
        }
    }

    fn parse_simple(body: &[u8], callback: &mut FrameRecorder) -> ParseResult<SimpleBlock> {
        let mut parser = SimpleBlockParser::default();
        parser.init(&metadata(body.len() as u64), u64::MAX)?;
        let mut reader = BufferReader::new(body.to_vec());
        let mut bytes_read = 0;
        let status = parser.feed(callback, &mut reader, &mut bytes_read)?;
        assert!(status.is_complete());
        assert_eq!(body.len() as u64, bytes_read);
        Ok(parser.take_value())
    }

    #[test]
    fn unlaced_block_single_frame() {
        let mut callback = FrameRecorder::default();
        // Track 1, timecode 0x0102, keyframe, no lacing, 3-byte frame.
        let body = [0x81, 0x01, 0x02, 0x80, 0xAA, 0xBB, 0xCC];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(1, block.track_number);
        assert_eq!(0x0102, block.timecode);
        assert!(block.is_key_frame);
        assert!(block.is_visible);
        assert!(!block.is_discardable);
        assert_eq!(Lacing::None, block.lacing);
        assert_eq!(1, block.num_frames);
        assert_eq!(vec![vec![0xAA, 0xBB, 0xCC]], callback.frames);
    }

    #[test]
    fn negative_timecode_and_flag_bits() {
        let mut callback = FrameRecorder::default();
        // Timecode -2, invisible, discardable.
        let body = [0x81, 0xFF, 0xFE, 0x09, 0x00];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(-2, block.timecode);
        assert!(!block.is_visible);
        assert!(block.is_discardable);
    }

    #[test]
    fn xiph_lacing() {
        let mut callback = FrameRecorder::default();
        // 3 frames: sizes 2, 1, remainder (3).
        let body = [
            0x81, 0x00, 0x00, 0x02, // header, Xiph lacing
            0x02, // lace count: 3 frames
            0x02, 0x01, // sizes of first two frames
            0x10, 0x11, 0x20, 0x30, 0x31, 0x32, // frame data
        ];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(Lacing::Xiph, block.lacing);
        assert_eq!(3, block.num_frames);
        assert_eq!(
            vec![vec![0x10, 0x11], vec![0x20], vec![0x30, 0x31, 0x32]],
            callback.frames
        );
    }

    #[test]
    fn xiph_lacing_long_size() {
        let mut callback = FrameRecorder::default();
        // First frame size 255 + 1 = 256, encoded as 0xFF 0x01.
        let mut body = vec![0x81, 0x00, 0x00, 0x02, 0x01, 0xFF, 0x01];
        body.extend(vec![0x55; 256]);
        body.extend(vec![0x66; 4]);
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(2, block.num_frames);
        assert_eq!(256, callback.frames[0].len());
        assert_eq!(vec![0x66; 4], callback.frames[1]);
    }

    #[test]
    fn ebml_lacing() {
        let mut callback = FrameRecorder::default();
        // 3 frames: first size 3 (vint 0x83), delta -1 (one-byte signed
        // vint: bias 63, encoded 62 -> 0xBE), remainder 4.
        let body = [
            0x81, 0x00, 0x00, 0x06, // header, EBML lacing
            0x02, // lace count: 3 frames
            0x83, 0xBE, // first size, then delta
            0x10, 0x11, 0x12, 0x20, 0x21, 0x30, 0x31, 0x32, 0x33, // frames: 3 + 2 + 4
        ];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(Lacing::Ebml, block.lacing);
        assert_eq!(3, block.num_frames);
        assert_eq!(
            vec![
                vec![0x10, 0x11, 0x12],
                vec![0x20, 0x21],
                vec![0x30, 0x31, 0x32, 0x33]
            ],
            callback.frames
        );
    }

    #[test]
    fn fixed_lacing_even_division() {
        let mut callback = FrameRecorder::default();
        let body = [
            0x81, 0x00, 0x00, 0x04, // header, fixed lacing
            0x01, // lace count: 2 frames
            0x10, 0x11, 0x20, 0x21, // 4 bytes over 2 frames
        ];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(Lacing::Fixed, block.lacing);
        assert_eq!(vec![vec![0x10, 0x11], vec![0x20, 0x21]], callback.frames);
    }

    #[test]
    fn fixed_lacing_uneven_division_fails() {
        let mut callback = FrameRecorder::default();
        let body = [0x81, 0x00, 0x00, 0x04, 0x01, 0x10, 0x11, 0x20];
        assert!(matches!(
            parse_simple(&body, &mut callback),
            Err(ParseError::InvalidElementValue { .. })
        ));
    }

    #[test]
    fn xiph_sizes_exceeding_body_fail() {
        let mut callback = FrameRecorder::default();
        // Claimed size 9 but only 2 bytes remain.
        let body = [0x81, 0x00, 0x00, 0x02, 0x01, 0x09, 0xAA, 0xBB];
        assert!(matches!(
            parse_simple(&body, &mut callback),
            Err(ParseError::InvalidElementValue { .. })
        ));
    }

    #[test]
    fn skip_action_discards_frames() {
        let mut callback = FrameRecorder {
            skip_blocks: true,
            ..FrameRecorder::default()
        };
        let body = [0x81, 0x01, 0x02, 0x80, 0xAA, 0xBB, 0xCC];
        let block = parse_simple(&body, &mut callback).unwrap();
        assert_eq!(1, callback.begins.len());
        assert!(callback.frames.is_empty());
        assert_eq!(1, block.track_number);
    }

    #[test]
    fn block_lacks_simple_block_flags() {
        let mut callback = FrameRecorder::default();
        let body = [0x82, 0x00, 0x05, 0x00, 0xEE];
        let mut parser = BlockParser::default();
        let meta = ElementMetadata {
            id: Id::BLOCK,
            header_size: 2,
            size: body.len() as u64,
            position: 0,
        };
        parser.init(&meta, u64::MAX).unwrap();
        let mut reader = BufferReader::new(body.to_vec());
        let mut bytes_read = 0;
        assert!(parser
            .feed(&mut callback, &mut reader, &mut bytes_read)
            .unwrap()
            .is_complete());
        let block = parser.take_value();
        assert_eq!(2, block.track_number);
        assert_eq!(5, block.timecode);
        assert_eq!(1, callback.block_begins.len());
        assert_eq!(vec![vec![0xEE]], callback.frames);
    }

    #[test]
    fn resumes_at_any_boundary() {
        let body = vec![
            0x81, 0x00, 0x00, 0x02, 0x02, 0x02, 0x01, 0x10, 0x11, 0x20, 0x30, 0x31, 0x32,
        ];
        for chunk_size in 1..body.len() {
            let mut parser = SimpleBlockParser::default();
            parser.init(&metadata(body.len() as u64), u64::MAX).unwrap();
            let mut callback = FrameRecorder::default();
            let mut reader = ChunkedReader::new(body.clone(), chunk_size);
            loop {
                let mut bytes_read = 0;
                let status = parser
                    .feed(&mut callback, &mut reader, &mut bytes_read)
                    .unwrap();
                if status.is_complete() {
                    break;
                }
            }
            assert_eq!(
                vec![vec![0x10, 0x11], vec![0x20], vec![0x30, 0x31, 0x32]],
                callback.frames,
                "chunk {}",
                chunk_size
            );
        }
    }
}

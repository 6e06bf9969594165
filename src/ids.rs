//!
//! EBML element IDs.
//!

use std::fmt;

///
/// An EBML element ID.
///
/// IDs keep their length-marker bits: two IDs are equal only if their full
/// encoded byte patterns are equal, which is how the Matroska specification
/// defines them.  Unrecognized IDs are still representable - the parser
/// reports them through
/// [`Callback::on_unknown_element`](crate::Callback::on_unknown_element)
/// rather than failing.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(u64);

impl Id {
    pub const EBML: Id = Id(0x1A45_DFA3);
    pub const EBML_VERSION: Id = Id(0x4286);
    pub const EBML_READ_VERSION: Id = Id(0x42F7);
    pub const EBML_MAX_ID_LENGTH: Id = Id(0x42F2);
    pub const EBML_MAX_SIZE_LENGTH: Id = Id(0x42F3);
    pub const DOC_TYPE: Id = Id(0x4282);
    pub const DOC_TYPE_VERSION: Id = Id(0x4287);
    pub const DOC_TYPE_READ_VERSION: Id = Id(0x4285);

    pub const VOID: Id = Id(0xEC);

    pub const SEGMENT: Id = Id(0x1853_8067);

    pub const SEEK_HEAD: Id = Id(0x114D_9B74);
    pub const SEEK: Id = Id(0x4DBB);
    pub const SEEK_ID: Id = Id(0x53AB);
    pub const SEEK_POSITION: Id = Id(0x53AC);

    pub const INFO: Id = Id(0x1549_A966);
    pub const TIMECODE_SCALE: Id = Id(0x2A_D7B1);
    pub const DURATION: Id = Id(0x4489);
    pub const DATE_UTC: Id = Id(0x4461);
    pub const TITLE: Id = Id(0x7BA9);
    pub const MUXING_APP: Id = Id(0x4D80);
    pub const WRITING_APP: Id = Id(0x5741);

    pub const CLUSTER: Id = Id(0x1F43_B675);
    pub const TIMECODE: Id = Id(0xE7);
    pub const PREV_SIZE: Id = Id(0xAB);
    pub const SIMPLE_BLOCK: Id = Id(0xA3);
    pub const BLOCK_GROUP: Id = Id(0xA0);
    pub const BLOCK: Id = Id(0xA1);
    pub const BLOCK_DURATION: Id = Id(0x9B);
    pub const REFERENCE_BLOCK: Id = Id(0xFB);
    pub const DISCARD_PADDING: Id = Id(0x75A2);

    pub const TRACKS: Id = Id(0x1654_AE6B);
    pub const TRACK_ENTRY: Id = Id(0xAE);
    pub const TRACK_NUMBER: Id = Id(0xD7);
    pub const TRACK_UID: Id = Id(0x73C5);
    pub const TRACK_TYPE: Id = Id(0x83);
    pub const FLAG_ENABLED: Id = Id(0xB9);
    pub const FLAG_DEFAULT: Id = Id(0x88);
    pub const FLAG_LACING: Id = Id(0x9C);
    pub const DEFAULT_DURATION: Id = Id(0x23_E383);
    pub const NAME: Id = Id(0x536E);
    pub const LANGUAGE: Id = Id(0x22_B59C);
    pub const CODEC_ID: Id = Id(0x86);
    pub const CODEC_PRIVATE: Id = Id(0x63A2);
    pub const CODEC_NAME: Id = Id(0x25_8688);
    pub const CODEC_DELAY: Id = Id(0x56AA);
    pub const SEEK_PRE_ROLL: Id = Id(0x56BB);
    pub const VIDEO: Id = Id(0xE0);
    pub const PIXEL_WIDTH: Id = Id(0xB0);
    pub const PIXEL_HEIGHT: Id = Id(0xBA);
    pub const DISPLAY_WIDTH: Id = Id(0x54B0);
    pub const DISPLAY_HEIGHT: Id = Id(0x54BA);
    pub const AUDIO: Id = Id(0xE1);
    pub const SAMPLING_FREQUENCY: Id = Id(0xB5);
    pub const CHANNELS: Id = Id(0x9F);
    pub const BIT_DEPTH: Id = Id(0x6264);

    pub const CUES: Id = Id(0x1C53_BB6B);
    pub const CUE_POINT: Id = Id(0xBB);
    pub const CUE_TIME: Id = Id(0xB3);
    pub const CUE_TRACK_POSITIONS: Id = Id(0xB7);
    pub const CUE_TRACK: Id = Id(0xF7);
    pub const CUE_CLUSTER_POSITION: Id = Id(0xF1);
    pub const CUE_RELATIVE_POSITION: Id = Id(0xF0);
    pub const CUE_BLOCK_NUMBER: Id = Id(0x5378);

    pub const CHAPTERS: Id = Id(0x1043_A770);
    pub const EDITION_ENTRY: Id = Id(0x45B9);
    pub const CHAPTER_ATOM: Id = Id(0xB6);
    pub const CHAPTER_UID: Id = Id(0x73C4);
    pub const CHAPTER_STRING_UID: Id = Id(0x5654);
    pub const CHAPTER_TIME_START: Id = Id(0x91);
    pub const CHAPTER_TIME_END: Id = Id(0x92);
    pub const CHAPTER_DISPLAY: Id = Id(0x80);
    pub const CHAP_STRING: Id = Id(0x85);
    pub const CHAP_LANGUAGE: Id = Id(0x437C);
    pub const CHAP_COUNTRY: Id = Id(0x437E);

    pub const TAGS: Id = Id(0x1254_C367);
    pub const TAG: Id = Id(0x7373);
    pub const TARGETS: Id = Id(0x63C0);
    pub const TARGET_TYPE_VALUE: Id = Id(0x68CA);
    pub const TARGET_TYPE: Id = Id(0x63CA);
    pub const TAG_TRACK_UID: Id = Id(0x63C5);
    pub const SIMPLE_TAG: Id = Id(0x67C8);
    pub const TAG_NAME: Id = Id(0x45A3);
    pub const TAG_LANGUAGE: Id = Id(0x447A);
    pub const TAG_DEFAULT: Id = Id(0x4484);
    pub const TAG_STRING: Id = Id(0x4487);
    pub const TAG_BINARY: Id = Id(0x4485);

    ///
    /// Builds an `Id` from its full encoded pattern (marker bits included).
    ///
    pub const fn new(value: u64) -> Self {
        Id(value)
    }

    /// The full encoded pattern, marker bits included.
    pub const fn value(self) -> u64 {
        self.0
    }

    ///
    /// The number of bytes this ID occupies in the stream, derived from the
    /// position of its marker bit.
    ///
    pub fn encoded_length(self) -> u32 {
        let mut length = 1;
        while length < 8 && self.0 >= 1 << (8 * length) {
            length += 1;
        }
        length
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

//!
//! Error and result types shared by every parser in the crate.
//!

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ParseResult<T> = Result<T, ParseError>;

///
/// The closed set of conditions that terminate a parse.
///
/// `ParseError` is deliberately small: anything that is not an error is
/// expressed through [`FeedStatus`](crate::FeedStatus) instead.  Every error
/// here is terminal for the element being parsed and, by propagation, for
/// all of its ancestors - the engine never guesses at intended structure or
/// silently rewraps a child's failure.
///
/// Positions are byte offsets from the start of the stream, as reported by
/// [`Reader::position`](crate::Reader::position).
///
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream ended before the current element was fully parsed.  At the
    /// top level, between elements, end of stream is not an error and is
    /// reported by [`WebmParser::feed`](crate::WebmParser::feed) as
    /// completion instead.
    #[error("stream ended in the middle of an element")]
    EndOfFile,

    /// A byte sequence that cannot be an EBML element ID (a first byte with
    /// more than three leading zero bits).
    #[error("invalid element id at position {position}")]
    InvalidElementId { position: u64 },

    /// An element size that is illegal where it appeared, for example an
    /// unknown-size element in a context that requires a known length, or a
    /// child that overflows its parent.
    #[error("invalid element size at position {position}")]
    InvalidElementSize { position: u64 },

    /// An element body that decodes to an illegal value for its kind, such
    /// as a boolean above 1 or a float that is neither 4 nor 8 bytes.
    #[error("invalid element value at position {position}")]
    InvalidElementValue { position: u64 },

    /// An element with an unrecognized ID declared an unknown size.  There
    /// is no schema information to decide where such an element ends, so it
    /// cannot be parsed or skipped.
    #[error("unknown element with indefinite size at position {position}")]
    IndefiniteUnknownElement { position: u64 },

    /// Self-referential elements nested beyond the supported depth.
    #[error("element recursion exceeded the supported depth")]
    RecursionLimitExceeded,

    /// The underlying byte source failed.
    #[error("error reading from the underlying stream")]
    Read {
        #[from]
        source: io::Error,
    },
}

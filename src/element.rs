//!
//! Metadata describing a single element in the stream, and the
//! present-or-defaulted value slot used by the DOM types.
//!

use crate::ids::Id;

/// Sentinel for an element whose header declares no size ("read until the
/// context implies a terminator").  Encoded on the wire as a size field
/// whose data bits are all ones.
pub const UNKNOWN_ELEMENT_SIZE: u64 = u64::MAX;

/// Sentinel position for elements reached via a seek, where the true start
/// offset of the element was never observed.
pub const UNKNOWN_ELEMENT_POSITION: u64 = u64::MAX;

/// Sentinel header size for elements reached via a seek.
pub const UNKNOWN_HEADER_SIZE: u32 = u32::MAX;

///
/// Everything known about an element before its body has been parsed.
///
/// Produced once per element, after its ID and size fields have been
/// decoded, and immutable for the element's lifetime.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementMetadata {
    /// The element's ID.
    pub id: Id,

    /// The number of bytes occupied by the element's ID and size fields, or
    /// [`UNKNOWN_HEADER_SIZE`] after a seek.
    pub header_size: u32,

    /// The declared size of the element body in bytes, or
    /// [`UNKNOWN_ELEMENT_SIZE`].
    pub size: u64,

    /// The absolute byte position at which the element starts, or
    /// [`UNKNOWN_ELEMENT_POSITION`] after a seek.
    pub position: u64,
}

impl ElementMetadata {
    /// True if the element's body length is not declared in its header.
    pub fn has_unknown_size(&self) -> bool {
        self.size == UNKNOWN_ELEMENT_SIZE
    }

    /// The absolute position of the first byte of the element body.
    pub fn body_position(&self) -> u64 {
        self.position + u64::from(self.header_size)
    }
}

///
/// A value slot that remembers whether its element actually appeared in the
/// stream.
///
/// Some elements define a non-zero default that applies only when the
/// element is absent (TimecodeScale, for example, defaults to 1,000,000).
/// Holding an `Option` would conflate "absent" with "present but empty", so
/// the slot instead always carries a value - the schema default until the
/// parser observes the element - alongside the `is_present` flag.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Element<T> {
    pub value: T,
    pub is_present: bool,
}

impl<T> Element<T> {
    /// A slot holding a default value for an element that has not been seen.
    pub fn absent(value: T) -> Self {
        Element {
            value,
            is_present: false,
        }
    }

    /// A slot holding a value that was explicitly encoded in the stream.
    pub fn present(value: T) -> Self {
        Element {
            value,
            is_present: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_versus_present() {
        let absent: Element<u64> = Element::absent(1_000_000);
        assert!(!absent.is_present);
        assert_eq!(1_000_000, absent.value);

        let present = Element::present(0u64);
        assert!(present.is_present);
        assert_eq!(0, present.value);

        assert_eq!(Element::<u64>::default(), Element::absent(0));
    }

    #[test]
    fn metadata_helpers() {
        let metadata = ElementMetadata {
            id: Id::SEGMENT,
            header_size: 12,
            size: UNKNOWN_ELEMENT_SIZE,
            position: 40,
        };
        assert!(metadata.has_unknown_size());
        assert_eq!(52, metadata.body_position());
    }
}

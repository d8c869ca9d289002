use std::fmt;

use thiserror::Error;

/// Where in the grammar a tag byte was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContext {
    /// Between regions: `START` or `EOF`.
    TopLevel,
    /// Inside a region: `FIELD` or `END`.
    RegionBody,
}

impl fmt::Display for TagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagContext::TopLevel => f.write_str("top-level"),
            TagContext::RegionBody => f.write_str("region body"),
        }
    }
}

/// Errors returned by tape decoding. Every variant aborts the whole decode.
///
/// # Examples
/// ```
/// use memtape_core::{DecodeError, TagContext};
///
/// let err = DecodeError::UnexpectedTag {
///     tag: 0x07,
///     offset: 12,
///     context: TagContext::RegionBody,
/// };
/// assert!(err.to_string().contains("unexpected tag 0x07"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(
        "tape truncated at offset {at_offset}: need {bytes_needed} bytes, got {bytes_available}"
    )]
    Truncated {
        at_offset: usize,
        bytes_needed: usize,
        bytes_available: usize,
    },
    #[error("unexpected tag 0x{tag:02x} at offset {offset} ({context})")]
    UnexpectedTag {
        tag: u8,
        offset: usize,
        context: TagContext,
    },
}

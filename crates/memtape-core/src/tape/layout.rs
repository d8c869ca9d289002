//! Wire-format constants for the tape stream.

pub const TAG_START: u8 = 0x01;
pub const TAG_END: u8 = 0x02;
pub const TAG_FIELD: u8 = 0x03;
pub const TAG_EOF: u8 = 0xFF;

pub const TAG_LEN: usize = 1;
pub const U64_LEN: usize = 8;
pub const CSTRING_TERMINATOR: u8 = 0x00;

/// One-byte record discriminator.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Start = TAG_START,
    End = TAG_END,
    Field = TAG_FIELD,
    Eof = TAG_EOF,
}

impl Tag {
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            TAG_START => Some(Self::Start),
            TAG_END => Some(Self::End),
            TAG_FIELD => Some(Self::Field),
            TAG_EOF => Some(Self::Eof),
            _ => None,
        }
    }
}

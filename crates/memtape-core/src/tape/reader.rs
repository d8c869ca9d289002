use super::error::DecodeError;
use super::layout;

/// Bounds-checked cursor over a borrowed tape buffer.
pub struct TapeReader<'a> {
    buf: &'a [u8],
    cur: usize,
}

impl<'a> TapeReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cur: 0 }
    }

    pub fn position(&self) -> usize {
        self.cur
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cur
    }

    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::Truncated {
                at_offset: self.cur,
                bytes_needed: needed,
                bytes_available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Returns the tag byte at the cursor without consuming it.
    pub fn peek_tag(&self) -> Result<u8, DecodeError> {
        self.require(layout::TAG_LEN)?;
        Ok(self.buf[self.cur])
    }

    /// Consumes a tag byte previously returned by [`TapeReader::peek_tag`].
    pub fn skip_tag(&mut self) -> Result<(), DecodeError> {
        self.require(layout::TAG_LEN)?;
        self.cur += layout::TAG_LEN;
        Ok(())
    }

    pub fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.read_slice(layout::U64_LEN)?;
        let mut raw = [0u8; layout::U64_LEN];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads a NUL-terminated string, mapping each byte to one `char`.
    ///
    /// No text decoding happens: byte `0xE9` becomes `'\u{e9}'`, not part of
    /// a UTF-8 sequence.
    pub fn read_cstring(&mut self) -> Result<String, DecodeError> {
        let rest = &self.buf[self.cur..];
        let Some(len) = rest
            .iter()
            .position(|&b| b == layout::CSTRING_TERMINATOR)
        else {
            return Err(DecodeError::Truncated {
                at_offset: self.cur,
                bytes_needed: rest.len() + 1,
                bytes_available: rest.len(),
            });
        };
        let value = rest[..len].iter().copied().map(char::from).collect();
        self.cur += len + 1;
        Ok(value)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        let bytes = &self.buf[self.cur..self.cur + len];
        self.cur += len;
        Ok(bytes)
    }
}

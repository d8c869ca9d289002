#![allow(dead_code)]

pub const START: u8 = 0x01;
pub const END: u8 = 0x02;
pub const FIELD: u8 = 0x03;
pub const EOF: u8 = 0xFF;

/// Writes tapes the way an instrumented program would, recording where
/// every tag byte lands.
#[derive(Default)]
pub struct TapeBuilder {
    bytes: Vec<u8>,
    tag_offsets: Vec<usize>,
}

impl TapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, kind: &str, addr: u64, size: u64) -> Self {
        self.tag(START);
        self.cstring(kind);
        self.bytes.extend_from_slice(&addr.to_le_bytes());
        self.bytes.extend_from_slice(&size.to_le_bytes());
        self
    }

    pub fn field(mut self, addr: u64, size: u64, name: &str) -> Self {
        self.tag(FIELD);
        self.bytes.extend_from_slice(&addr.to_le_bytes());
        self.bytes.extend_from_slice(&size.to_le_bytes());
        self.cstring(name);
        self
    }

    pub fn end(mut self) -> Self {
        self.tag(END);
        self
    }

    pub fn eof(mut self) -> Self {
        self.tag(EOF);
        self
    }

    pub fn tag_offsets(&self) -> &[usize] {
        &self.tag_offsets
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn tag(&mut self, tag: u8) {
        self.tag_offsets.push(self.bytes.len());
        self.bytes.push(tag);
    }

    fn cstring(&mut self, value: &str) {
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
    }
}

/// Two regions, one with a gap-free pair of fields and one with a hole.
pub fn sample_tape() -> TapeBuilder {
    TapeBuilder::new()
        .start("header", 0x1000, 16)
        .field(0x1000, 4, "magic")
        .field(0x1008, 8, "len")
        .end()
        .start("cstring", 0x2000, 6)
        .end()
        .eof()
}

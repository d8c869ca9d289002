use serde::{Deserialize, Serialize};

use super::error::{DecodeError, TagContext};
use super::layout::Tag;
use super::reader::TapeReader;

/// A region record as it appeared on the tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRegion {
    /// Category name written by the encoder (e.g. a struct name).
    pub kind: String,
    pub addr: u64,
    pub size: u64,
    /// Fields in stream order; the decoder does not sort them.
    pub fields: Vec<DecodedField>,
}

/// A field record inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedField {
    pub addr: u64,
    pub size: u64,
    pub name: String,
}

/// Decode a complete tape into its regions.
///
/// The stream must end with an `EOF` tag; bytes after it are ignored. Any
/// error discards everything decoded so far.
///
/// # Examples
/// ```
/// use memtape_core::decode;
///
/// let mut tape = vec![0x01];
/// tape.extend_from_slice(b"x\0");
/// tape.extend_from_slice(&0u64.to_le_bytes());
/// tape.extend_from_slice(&16u64.to_le_bytes());
/// tape.push(0x03);
/// tape.extend_from_slice(&4u64.to_le_bytes());
/// tape.extend_from_slice(&4u64.to_le_bytes());
/// tape.extend_from_slice(b"len\0");
/// tape.extend_from_slice(&[0x02, 0xff]);
///
/// let regions = decode(&tape)?;
/// assert_eq!(regions.len(), 1);
/// assert_eq!(regions[0].fields[0].name, "len");
/// # Ok::<(), memtape_core::DecodeError>(())
/// ```
///
/// # Errors
/// Returns [`DecodeError::Truncated`] when the buffer ends before the `EOF`
/// tag, and [`DecodeError::UnexpectedTag`] when a tag byte is not valid at
/// its position.
pub fn decode(buf: &[u8]) -> Result<Vec<DecodedRegion>, DecodeError> {
    let mut reader = TapeReader::new(buf);
    let mut regions = Vec::new();

    loop {
        let offset = reader.position();
        let tag = reader.peek_tag()?;
        match Tag::from_byte(tag) {
            Some(Tag::Eof) => break,
            Some(Tag::Start) => {
                reader.skip_tag()?;
                let region = decode_region(&mut reader)?;
                tracing::trace!(
                    offset,
                    kind = %region.kind,
                    addr = region.addr,
                    fields = region.fields.len(),
                    "decoded region"
                );
                regions.push(region);
            }
            _ => {
                return Err(DecodeError::UnexpectedTag {
                    tag,
                    offset,
                    context: TagContext::TopLevel,
                });
            }
        }
    }

    let trailing = reader.remaining() - 1;
    tracing::debug!(regions = regions.len(), trailing, "tape decoded");
    Ok(regions)
}

fn decode_region(reader: &mut TapeReader<'_>) -> Result<DecodedRegion, DecodeError> {
    let kind = reader.read_cstring()?;
    let addr = reader.read_u64_le()?;
    let size = reader.read_u64_le()?;
    let mut fields = Vec::new();

    loop {
        let offset = reader.position();
        let tag = reader.peek_tag()?;
        match Tag::from_byte(tag) {
            Some(Tag::Field) => {
                reader.skip_tag()?;
                fields.push(decode_field(reader)?);
            }
            Some(Tag::End) => {
                reader.skip_tag()?;
                break;
            }
            _ => {
                return Err(DecodeError::UnexpectedTag {
                    tag,
                    offset,
                    context: TagContext::RegionBody,
                });
            }
        }
    }

    Ok(DecodedRegion {
        kind,
        addr,
        size,
        fields,
    })
}

fn decode_field(reader: &mut TapeReader<'_>) -> Result<DecodedField, DecodeError> {
    let addr = reader.read_u64_le()?;
    let size = reader.read_u64_le()?;
    let name = reader.read_cstring()?;
    Ok(DecodedField { addr, size, name })
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::tape::error::{DecodeError, TagContext};
    use crate::tape::layout;

    fn start(buf: &mut Vec<u8>, kind: &str, addr: u64, size: u64) {
        buf.push(layout::TAG_START);
        buf.extend_from_slice(kind.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&addr.to_le_bytes());
        buf.extend_from_slice(&size.to_le_bytes());
    }

    fn field(buf: &mut Vec<u8>, addr: u64, size: u64, name: &str) {
        buf.push(layout::TAG_FIELD);
        buf.extend_from_slice(&addr.to_le_bytes());
        buf.extend_from_slice(&size.to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
    }

    #[test]
    fn decode_empty_stream() {
        let regions = decode(&[layout::TAG_EOF]).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn decode_single_region_with_field() {
        let mut buf = Vec::new();
        start(&mut buf, "x", 0, 16);
        field(&mut buf, 4, 4, "len");
        buf.push(layout::TAG_END);
        buf.push(layout::TAG_EOF);

        let regions = decode(&buf).unwrap();
        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.kind, "x");
        assert_eq!(region.addr, 0);
        assert_eq!(region.size, 16);
        assert_eq!(region.fields.len(), 1);
        assert_eq!(region.fields[0].addr, 4);
        assert_eq!(region.fields[0].size, 4);
        assert_eq!(region.fields[0].name, "len");
    }

    #[test]
    fn decode_keeps_stream_order_of_fields() {
        let mut buf = Vec::new();
        start(&mut buf, "s", 0x100, 8);
        field(&mut buf, 0x104, 4, "b");
        field(&mut buf, 0x100, 4, "a");
        buf.push(layout::TAG_END);
        buf.push(layout::TAG_EOF);

        let regions = decode(&buf).unwrap();
        let names: Vec<_> = regions[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn decode_ignores_bytes_after_eof() {
        let buf = [layout::TAG_EOF, 0x42, 0x00];
        assert!(decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn decode_empty_buffer_is_truncated() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { at_offset: 0, .. }));
    }

    #[test]
    fn decode_missing_eof_is_truncated() {
        let mut buf = Vec::new();
        start(&mut buf, "x", 0, 1);
        buf.push(layout::TAG_END);
        let len = buf.len();

        let err = decode(&buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                at_offset: len,
                bytes_needed: 1,
                bytes_available: 0,
            }
        );
    }

    #[test]
    fn decode_rejects_end_at_top_level() {
        let err = decode(&[layout::TAG_END, layout::TAG_EOF]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedTag {
                tag: layout::TAG_END,
                offset: 0,
                context: TagContext::TopLevel,
            }
        );
    }

    #[test]
    fn decode_rejects_nested_start() {
        let mut buf = Vec::new();
        start(&mut buf, "outer", 0, 8);
        let offset = buf.len();
        start(&mut buf, "inner", 0, 4);

        let err = decode(&buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedTag {
                tag: layout::TAG_START,
                offset,
                context: TagContext::RegionBody,
            }
        );
    }

    #[test]
    fn decode_error_message_names_context() {
        let err = decode(&[0x00]).unwrap_err();
        assert_eq!(err.to_string(), "unexpected tag 0x00 at offset 0 (top-level)");
    }
}

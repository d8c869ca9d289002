mod common;

use common::{TapeBuilder, sample_tape};
use memtape_core::{DecodeError, DecodedField, DecodedRegion, TagContext, decode};

#[test]
fn decode_matches_constructed_input() {
    let tape = TapeBuilder::new()
        .start("list", 0x10, 24)
        .field(0x10, 8, "head")
        .field(0x18, 8, "tail")
        .field(0x20, 8, "len")
        .end()
        .start("node", 0x80, 16)
        .field(0x88, 8, "next")
        .end()
        .start("empty", 0x100, 0)
        .end()
        .eof();

    let regions = decode(tape.bytes()).unwrap();

    assert_eq!(
        regions,
        vec![
            DecodedRegion {
                kind: "list".to_string(),
                addr: 0x10,
                size: 24,
                fields: vec![
                    DecodedField {
                        addr: 0x10,
                        size: 8,
                        name: "head".to_string(),
                    },
                    DecodedField {
                        addr: 0x18,
                        size: 8,
                        name: "tail".to_string(),
                    },
                    DecodedField {
                        addr: 0x20,
                        size: 8,
                        name: "len".to_string(),
                    },
                ],
            },
            DecodedRegion {
                kind: "node".to_string(),
                addr: 0x80,
                size: 16,
                fields: vec![DecodedField {
                    addr: 0x88,
                    size: 8,
                    name: "next".to_string(),
                }],
            },
            DecodedRegion {
                kind: "empty".to_string(),
                addr: 0x100,
                size: 0,
                fields: Vec::new(),
            },
        ]
    );
}

#[test]
fn decode_full_width_addresses() {
    let tape = TapeBuilder::new()
        .start("top", u64::MAX - 7, 8)
        .field(u64::MAX - 7, 8, "word")
        .end()
        .eof();

    let regions = decode(tape.bytes()).unwrap();
    assert_eq!(regions[0].addr, u64::MAX - 7);
    assert_eq!(regions[0].fields[0].addr, u64::MAX - 7);
}

#[test]
fn every_proper_prefix_is_truncated() {
    let tape = sample_tape();
    let bytes = tape.bytes();

    for len in 0..bytes.len() {
        match decode(&bytes[..len]) {
            Err(DecodeError::Truncated { .. }) => {}
            other => panic!("prefix of {len} bytes decoded to {other:?}"),
        }
    }
    assert_eq!(decode(bytes).unwrap().len(), 2);
}

#[test]
fn invalid_tag_bytes_are_rejected_at_every_tag_position() {
    let tape = sample_tape();
    let invalid = [0x00u8, 0x04, 0x10, 0x7f, 0x80, 0xfe];

    for &offset in tape.tag_offsets() {
        for &bad in &invalid {
            let mut bytes = tape.bytes().to_vec();
            bytes[offset] = bad;
            match decode(&bytes) {
                Err(DecodeError::UnexpectedTag { tag, offset: at, .. }) => {
                    assert_eq!(tag, bad);
                    assert_eq!(at, offset);
                }
                other => panic!("tag 0x{bad:02x} at {offset} decoded to {other:?}"),
            }
        }
    }
}

#[test]
fn field_tag_outside_region_is_top_level_error() {
    let tape = TapeBuilder::new().field(0, 1, "stray").eof();
    let err = decode(tape.bytes()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnexpectedTag {
            tag: common::FIELD,
            offset: 0,
            context: TagContext::TopLevel,
        }
    );
}

#[test]
fn eof_inside_region_is_region_body_error() {
    let tape = TapeBuilder::new().start("open", 0, 4).eof();
    let offset = *tape.tag_offsets().last().unwrap();
    let err = decode(tape.bytes()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnexpectedTag {
            tag: common::EOF,
            offset,
            context: TagContext::RegionBody,
        }
    );
}

#[test]
fn names_are_decoded_byte_per_char() {
    let mut bytes = TapeBuilder::new().start("k", 0, 1).into_bytes();
    bytes.push(common::FIELD);
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(&1u64.to_le_bytes());
    bytes.extend_from_slice(&[b'n', 0xff, 0x00]);
    bytes.extend_from_slice(&[common::END, common::EOF]);

    let regions = decode(&bytes).unwrap();
    assert_eq!(regions[0].fields[0].name, "n\u{ff}");
}

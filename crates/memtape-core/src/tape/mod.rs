//! Tape decoding.
//!
//! A tape is a little-endian, tag-framed stream written by an instrumented
//! program while walking its own data structures:
//!
//! ```text
//! stream      := (START cstring:kind u64:addr u64:size field* END)* EOF
//! field       := FIELD u64:addr u64:size cstring:name
//! ```
//!
//! Decoding is all-or-nothing: a truncated or malformed tape yields an error
//! and no regions. Tag values and record sizes live in `layout`, bounds
//! checks in `reader`, and the grammar walk in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::{DecodeError, TagContext};
pub use parser::{DecodedField, DecodedRegion, decode};

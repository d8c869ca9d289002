//! memtape core library: decode memory-layout tapes and lay them out for
//! rendering.
//!
//! An instrumented program walks its own data structures and writes a
//! compact tag-framed "tape" describing each region it visited and the
//! fields inside it. This crate turns that tape back into regions
//! (`tape`), lets callers wrap them in a presentation view-model (`model`),
//! and computes gap-free, address-ordered field rows and aligned bar rows
//! for each region (`arrange`). `view` assembles the result into an
//! abstract tree a renderer can draw directly.
//!
//! Everything here is pure and synchronous; file access lives in the CLI.
//!
//! Invariants:
//! - Decoding is all-or-nothing: malformed input yields an error, never a
//!   partial region list.
//! - A padded field row tiles its span exactly when the input fields are
//!   ordered and non-overlapping; fields are never reordered or dropped.
//! - Subfields nest at most one level.
//!
//! # Examples
//! ```
//! use memtape_core::{Tape, ViewOptions, build_tape_view, decode};
//!
//! let mut bytes = vec![0x01];
//! bytes.extend_from_slice(b"node\0");
//! bytes.extend_from_slice(&0x40u64.to_le_bytes());
//! bytes.extend_from_slice(&8u64.to_le_bytes());
//! bytes.extend_from_slice(&[0x02, 0xff]);
//!
//! let regions = decode(&bytes)?;
//! let view = build_tape_view(&Tape::from_decoded(&regions), &ViewOptions::default())?;
//! assert_eq!(view.regions[0].addr_label, "0x40");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod arrange;
mod hex;
pub mod model;
pub mod tape;
pub mod view;

pub use arrange::{
    LayoutError, bar_rows, check_fields, normalize_bars, pad, pad_subfields, padded_bars,
};
pub use hex::{byte, hex};
pub use model::{
    Bar, CallbackHandle, Content, Field, FieldContent, NBSP, OpaqueHandle, Region, Tape,
};
pub use tape::{DecodeError, DecodedField, DecodedRegion, TagContext, decode};
pub use view::{
    BarView, DEFAULT_ZOOM, FieldBody, FieldView, RegionView, TapeView, ViewError, ViewOptions,
    build_tape_view,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "memtape").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "memtape".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Input tape metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided by the caller.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Decoded regions of one tape.
///
/// # Examples
/// ```
/// use memtape_core::make_decode_report;
///
/// let report = make_decode_report("dump.tape", 1, Vec::new());
/// assert_eq!(report.report_version, memtape_core::REPORT_VERSION);
/// assert!(report.regions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    /// Regions in stream order.
    pub regions: Vec<DecodedRegion>,
}

/// Laid-out view tree of one tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub tape: TapeView,
}

pub fn make_decode_report(
    input_path: &str,
    input_bytes: u64,
    regions: Vec<DecodedRegion>,
) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo::current(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        regions,
    }
}

pub fn make_layout_report(input_path: &str, input_bytes: u64, tape: TapeView) -> LayoutReport {
    LayoutReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo::current(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        tape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_report_serializes_regions_in_order() {
        let regions = vec![
            DecodedRegion {
                kind: "a".to_string(),
                addr: 0,
                size: 1,
                fields: Vec::new(),
            },
            DecodedRegion {
                kind: "b".to_string(),
                addr: 1,
                size: 1,
                fields: Vec::new(),
            },
        ];
        let report = make_decode_report("dump.tape", 42, regions);

        let value = serde_json::to_value(&report).expect("report json");
        assert_eq!(value["tool"]["name"], "memtape");
        assert_eq!(value["input"]["bytes"], 42);
        assert_eq!(value["regions"][0]["kind"], "a");
        assert_eq!(value["regions"][1]["kind"], "b");
        assert!(value["regions"][0]["fields"].as_array().unwrap().is_empty());
    }

    #[test]
    fn layout_report_omits_absent_regions() {
        let view = build_tape_view(&Tape::default(), &ViewOptions::default()).unwrap();
        let report = make_layout_report("dump.tape", 1, view);

        let value = serde_json::to_value(&report).expect("report json");
        let tape = &value["tape"];
        assert!(tape.get("pre_region").is_none());
        assert!(tape.get("post_region").is_none());
        assert!(tape.get("children").is_none());
        assert_eq!(tape["zoom"], DEFAULT_ZOOM);
    }
}

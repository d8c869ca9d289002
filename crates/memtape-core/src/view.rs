//! Abstract view tree handed to a renderer.
//!
//! This is the boundary to whatever draws the tape: every node carries its
//! `addr`/`size` untouched plus pixel sizes derived from the zoom. Clamping
//! widths, styling and event wiring belong to the renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arrange::{LayoutError, bar_rows, pad, pad_subfields, padded_bars};
use crate::hex::hex;
use crate::model::{Bar, CallbackHandle, Content, Field, FieldContent, Region, Tape};

/// Default pixels per address unit.
pub const DEFAULT_ZOOM: u64 = 24;

/// Rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Pixels per address unit, used when a tape sets no zoom of its own.
    pub zoom: u64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeView {
    pub zoom: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_region: Option<RegionView>,
    pub regions: Vec<RegionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_region: Option<RegionView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TapeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionView {
    pub addr: u64,
    pub size: u64,
    /// Region start formatted as `0x…`.
    pub addr_label: String,
    /// Gap-free fields covering the region.
    pub fields: Vec<FieldView>,
    /// Bar rows, as many as every sibling region in the tape.
    pub bars: Vec<BarView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub addr: u64,
    pub size: u64,
    pub width_px: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Content>,
    pub body: FieldBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onclick: Option<CallbackHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldBody {
    Leaf(Content),
    Padding,
    /// Padded subfields; their bodies are never `Subfields`.
    Subfields(Vec<FieldView>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarView {
    pub addr: u64,
    pub size: u64,
    /// Distance from the region start, 0 for bars that start before it.
    pub offset_px: u64,
    pub width_px: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Build the view tree for `tape` and, depth-first, its child tapes.
///
/// Bar rows are shared across the pre-region, the regions and the
/// post-region. Child tapes inherit the effective zoom unless they set
/// their own.
///
/// # Examples
/// ```
/// use memtape_core::{Content, Field, FieldBody, Region, Tape, ViewOptions, build_tape_view};
///
/// let region = Region::new(0, 16, vec![Field::leaf(4, 4, Content::text("len"))]);
/// let view = build_tape_view(&Tape::new(vec![region]), &ViewOptions::default())?;
///
/// let fields = &view.regions[0].fields;
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields[0].body, FieldBody::Padding);
/// assert_eq!(fields[1].width_px, 4 * 24);
/// # Ok::<(), memtape_core::ViewError>(())
/// ```
///
/// # Errors
/// Returns [`ViewError::Layout`] when a field nests subfields more than one
/// level deep.
pub fn build_tape_view(tape: &Tape, options: &ViewOptions) -> Result<TapeView, ViewError> {
    let zoom = tape.zoom.unwrap_or(options.zoom);
    let builder = RegionBuilder {
        zoom,
        bar_rows: bar_rows(tape.all_regions()),
    };

    let pre_region = tape
        .pre_region
        .as_ref()
        .map(|region| builder.region(region))
        .transpose()?;
    let regions = tape
        .regions
        .iter()
        .map(|region| builder.region(region))
        .collect::<Result<Vec<_>, _>>()?;
    let post_region = tape
        .post_region
        .as_ref()
        .map(|region| builder.region(region))
        .transpose()?;

    let child_options = ViewOptions { zoom };
    let children = tape
        .children
        .iter()
        .map(|child| build_tape_view(child, &child_options))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        regions = regions.len(),
        children = children.len(),
        zoom,
        "built tape view"
    );

    Ok(TapeView {
        zoom,
        pre_region,
        regions,
        post_region,
        children,
    })
}

struct RegionBuilder {
    zoom: u64,
    bar_rows: usize,
}

impl RegionBuilder {
    fn width(&self, size: u64) -> u64 {
        size.saturating_mul(self.zoom)
    }

    fn region(&self, region: &Region) -> Result<RegionView, LayoutError> {
        let fields = pad(region.addr, region.size, &region.fields)?
            .iter()
            .map(|field| self.field(field))
            .collect::<Result<Vec<_>, _>>()?;
        let bars = padded_bars(region, self.bar_rows)
            .iter()
            .map(|bar| self.bar(region, bar))
            .collect();

        Ok(RegionView {
            addr: region.addr,
            size: region.size,
            addr_label: hex(region.addr),
            fields,
            bars,
            description: region.description.clone(),
        })
    }

    fn field(&self, field: &Field) -> Result<FieldView, LayoutError> {
        let body = match &field.content {
            FieldContent::Leaf(content) => FieldBody::Leaf(content.normalized()),
            FieldContent::Padding => FieldBody::Padding,
            FieldContent::Subfields(_) => FieldBody::Subfields(
                pad_subfields(field)?
                    .iter()
                    .map(|subfield| self.subfield(subfield))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(FieldView {
            addr: field.addr,
            size: field.size,
            width_px: self.width(field.size),
            name: field.name.as_ref().map(Content::normalized),
            tag: field.tag.clone(),
            body,
            onclick: field.onclick,
        })
    }

    fn subfield(&self, subfield: &Field) -> Result<FieldView, LayoutError> {
        let body = match &subfield.content {
            FieldContent::Leaf(content) => FieldBody::Leaf(content.normalized()),
            FieldContent::Padding => FieldBody::Padding,
            FieldContent::Subfields(_) => {
                return Err(LayoutError::NestedSubfield {
                    addr: subfield.addr,
                    size: subfield.size,
                });
            }
        };

        Ok(FieldView {
            addr: subfield.addr,
            size: subfield.size,
            width_px: self.width(subfield.size),
            name: subfield.name.as_ref().map(Content::normalized),
            tag: subfield.tag.clone(),
            body,
            onclick: subfield.onclick,
        })
    }

    fn bar(&self, region: &Region, bar: &Bar) -> BarView {
        BarView {
            addr: bar.addr,
            size: bar.size,
            offset_px: self.width(bar.addr.saturating_sub(region.addr)),
            width_px: self.width(bar.size),
            color: bar.color.clone(),
        }
    }
}

//! View-model consumed by the layout engine and the view builder.
//!
//! These types are built by calling code, usually from decoded regions plus
//! whatever presentation intent the caller has (bars, descriptions, click
//! handles). The core only reads them.

use serde::{Deserialize, Serialize};

use crate::tape::{DecodedField, DecodedRegion};

/// Non-breaking space used in place of blank text.
pub const NBSP: &str = "\u{a0}";

/// Caller-owned handle to pre-built visual content. Never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaqueHandle(pub u64);

/// Caller-owned handle to a click callback. Never invoked by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackHandle(pub u64);

/// Leaf renderable content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Opaque(OpaqueHandle),
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text(value.into())
    }

    /// Trim text content; blank text becomes a single non-breaking space.
    ///
    /// # Examples
    /// ```
    /// use memtape_core::{Content, NBSP};
    ///
    /// assert_eq!(Content::text("  len ").normalized(), Content::text("len"));
    /// assert_eq!(Content::text("   ").normalized(), Content::text(NBSP));
    /// ```
    pub fn normalized(&self) -> Content {
        match self {
            Content::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Content::text(NBSP)
                } else {
                    Content::text(trimmed)
                }
            }
            other => other.clone(),
        }
    }
}

/// What a field holds: leaf content, one level of subfields, or nothing
/// because the layout engine synthesized it to fill a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldContent {
    Leaf(Content),
    Subfields(Vec<Field>),
    Padding,
}

impl Default for FieldContent {
    fn default() -> Self {
        FieldContent::Leaf(Content::Empty)
    }
}

/// A named span inside a region or, once, inside another field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub addr: u64,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Content>,
    #[serde(default)]
    pub content: FieldContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onclick: Option<CallbackHandle>,
}

impl Field {
    pub fn leaf(addr: u64, size: u64, content: Content) -> Self {
        Self {
            addr,
            size,
            name: None,
            tag: None,
            content: FieldContent::Leaf(content),
            onclick: None,
        }
    }

    pub fn composite(addr: u64, size: u64, subfields: Vec<Field>) -> Self {
        Self {
            content: FieldContent::Subfields(subfields),
            ..Self::leaf(addr, size, Content::Empty)
        }
    }

    /// Synthetic gap filler covering `[addr, addr + size)`.
    pub fn padding(addr: u64, size: u64) -> Self {
        Self {
            content: FieldContent::Padding,
            ..Self::leaf(addr, size, Content::Empty)
        }
    }

    pub fn with_name(mut self, name: Content) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_tag(mut self, tag: Content) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_onclick(mut self, onclick: CallbackHandle) -> Self {
        self.onclick = Some(onclick);
        self
    }

    /// One past the last covered address, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.addr.saturating_add(self.size)
    }

    pub fn is_padding(&self) -> bool {
        matches!(self.content, FieldContent::Padding)
    }

    pub fn subfields(&self) -> Option<&[Field]> {
        match &self.content {
            FieldContent::Subfields(subfields) => Some(subfields),
            _ => None,
        }
    }
}

impl From<&DecodedField> for Field {
    fn from(value: &DecodedField) -> Self {
        Field::leaf(value.addr, value.size, Content::Empty).with_name(Content::text(&value.name))
    }
}

/// Overlay span drawn under a region, independent of field boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub addr: u64,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Bar {
    pub fn new(addr: u64, size: u64) -> Self {
        Self {
            addr,
            size,
            color: None,
        }
    }

    /// Zero-address, zero-size bar used to align bar rows.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub addr: u64,
    pub size: u64,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bars: Vec<Bar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Content>,
}

impl Region {
    pub fn new(addr: u64, size: u64, fields: Vec<Field>) -> Self {
        Self {
            addr,
            size,
            fields,
            bars: Vec::new(),
            description: None,
        }
    }

    /// Region whose fields carry the decoded names and no content.
    ///
    /// # Examples
    /// ```
    /// use memtape_core::{Content, DecodedField, DecodedRegion, Region};
    ///
    /// let decoded = DecodedRegion {
    ///     kind: "header".to_string(),
    ///     addr: 0x10,
    ///     size: 8,
    ///     fields: vec![DecodedField { addr: 0x10, size: 4, name: "magic".to_string() }],
    /// };
    /// let region = Region::from_decoded(&decoded);
    /// assert_eq!(region.fields[0].name, Some(Content::text("magic")));
    /// ```
    pub fn from_decoded(decoded: &DecodedRegion) -> Self {
        Self::new(
            decoded.addr,
            decoded.size,
            decoded.fields.iter().map(Field::from).collect(),
        )
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_description(mut self, description: Content) -> Self {
        self.description = Some(description);
        self
    }

    pub fn end(&self) -> u64 {
        self.addr.saturating_add(self.size)
    }
}

/// A row of regions, with optional leading/trailing regions and child tapes
/// rendered beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_region: Option<Region>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_region: Option<Region>,
    /// Pixels per address unit; overrides the builder's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tape>,
}

impl Tape {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn from_decoded(decoded: &[DecodedRegion]) -> Self {
        Self::new(decoded.iter().map(Region::from_decoded).collect())
    }

    pub fn with_pre_region(mut self, region: Region) -> Self {
        self.pre_region = Some(region);
        self
    }

    pub fn with_post_region(mut self, region: Region) -> Self {
        self.post_region = Some(region);
        self
    }

    pub fn with_zoom(mut self, zoom: u64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_child(mut self, child: Tape) -> Self {
        self.children.push(child);
        self
    }

    /// Pre-region, regions and post-region in render order.
    pub fn all_regions(&self) -> impl Iterator<Item = &Region> {
        self.pre_region
            .iter()
            .chain(&self.regions)
            .chain(self.post_region.iter())
    }
}

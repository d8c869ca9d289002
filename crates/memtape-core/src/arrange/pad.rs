use crate::model::{Field, FieldContent};

use super::error::LayoutError;

/// Fill the gaps between `fields` so the result tiles
/// `[base_addr, base_addr + span_size)`.
///
/// Fields are emitted unchanged and in the given order, with a padding
/// field before any field that starts past the running cursor and one
/// after the last field when it ends short of the span. Ordering is the
/// caller's job: overlapping or descending fields are passed through as-is
/// (use [`check_fields`] to reject them up front).
///
/// # Examples
/// ```
/// use memtape_core::{Content, Field, pad};
///
/// let len = Field::leaf(4, 4, Content::text("len"));
/// let padded = pad(0, 16, &[len.clone()])?;
///
/// let spans: Vec<_> = padded.iter().map(|f| (f.addr, f.size, f.is_padding())).collect();
/// assert_eq!(spans, vec![(0, 4, true), (4, 4, false), (8, 8, true)]);
/// assert_eq!(padded[1], len);
/// # Ok::<(), memtape_core::LayoutError>(())
/// ```
///
/// # Errors
/// Returns [`LayoutError::NestedSubfield`] when a composite field holds a
/// subfield that is itself composite.
pub fn pad(base_addr: u64, span_size: u64, fields: &[Field]) -> Result<Vec<Field>, LayoutError> {
    for field in fields {
        if let Some(subfields) = field.subfields() {
            reject_composite(subfields)?;
        }
    }
    Ok(fill_gaps(base_addr, span_size, fields))
}

/// Pad a composite field's subfields over the field's own span.
///
/// Subfields without a click handle, padding included, take the parent's.
/// A leaf or padding parent has no subfields and yields an empty list.
///
/// # Errors
/// Returns [`LayoutError::NestedSubfield`] for the first subfield whose
/// content is a field sequence.
pub fn pad_subfields(parent: &Field) -> Result<Vec<Field>, LayoutError> {
    let Some(subfields) = parent.subfields() else {
        return Ok(Vec::new());
    };
    reject_composite(subfields)?;

    let mut padded = fill_gaps(parent.addr, parent.size, subfields);
    if let Some(onclick) = parent.onclick {
        for subfield in &mut padded {
            if subfield.onclick.is_none() {
                subfield.onclick = Some(onclick);
            }
        }
    }
    Ok(padded)
}

/// Check that `fields` ascend, do not overlap, and stay inside the span.
/// Subfields are checked against their parent's span. Ends are computed
/// without saturation, so a field or span running past `u64::MAX` fails.
///
/// # Errors
/// Returns [`LayoutError::SpanOverflow`] when the span itself wraps, then
/// the first [`LayoutError::Overlap`] or [`LayoutError::OutOfSpan`] found,
/// walking fields in order.
pub fn check_fields(base_addr: u64, span_size: u64, fields: &[Field]) -> Result<(), LayoutError> {
    let span_end = base_addr
        .checked_add(span_size)
        .ok_or(LayoutError::SpanOverflow {
            base_addr,
            span_size,
        })?;
    let mut cursor = base_addr;
    for field in fields {
        if field.addr < cursor {
            return Err(LayoutError::Overlap {
                addr: field.addr,
                cursor,
            });
        }
        let out_of_span = LayoutError::OutOfSpan {
            addr: field.addr,
            size: field.size,
            span_end,
        };
        let Some(field_end) = field.addr.checked_add(field.size) else {
            return Err(out_of_span);
        };
        if field_end > span_end {
            return Err(out_of_span);
        }
        if let Some(subfields) = field.subfields() {
            check_fields(field.addr, field.size, subfields)?;
        }
        cursor = field_end;
    }
    Ok(())
}

fn reject_composite(subfields: &[Field]) -> Result<(), LayoutError> {
    match subfields
        .iter()
        .find(|sub| matches!(sub.content, FieldContent::Subfields(_)))
    {
        Some(sub) => Err(LayoutError::NestedSubfield {
            addr: sub.addr,
            size: sub.size,
        }),
        None => Ok(()),
    }
}

fn fill_gaps(base_addr: u64, span_size: u64, fields: &[Field]) -> Vec<Field> {
    let span_end = base_addr.saturating_add(span_size);
    let mut padded = Vec::with_capacity(fields.len() * 2 + 1);
    let mut cursor = base_addr;
    let mut warned = false;

    for field in fields {
        if cursor < field.addr {
            padded.push(Field::padding(cursor, field.addr - cursor));
        } else if cursor > field.addr && !warned {
            tracing::warn!(
                addr = field.addr,
                cursor,
                "field overlaps or precedes the previous one"
            );
            warned = true;
        }
        padded.push(field.clone());
        cursor = field.end();
    }
    if cursor < span_end {
        padded.push(Field::padding(cursor, span_end - cursor));
    }

    padded
}

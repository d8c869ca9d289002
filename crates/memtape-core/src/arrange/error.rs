use thiserror::Error;

/// Errors returned by the layout engine.
///
/// # Examples
/// ```
/// use memtape_core::LayoutError;
///
/// let err = LayoutError::NestedSubfield { addr: 0x10, size: 4 };
/// assert!(err.to_string().contains("nests another field sequence"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("subfield at {addr:#x} (size {size}) nests another field sequence")]
    NestedSubfield { addr: u64, size: u64 },
    #[error("field at {addr:#x} starts before {cursor:#x}, overlapping or out of order")]
    Overlap { addr: u64, cursor: u64 },
    #[error("field at {addr:#x} (size {size}) extends past span end {span_end:#x}")]
    OutOfSpan { addr: u64, size: u64, span_end: u64 },
    #[error("span at {base_addr:#x} (size {span_size}) runs past the end of the address space")]
    SpanOverflow { base_addr: u64, span_size: u64 },
}

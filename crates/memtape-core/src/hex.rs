/// Address label with a `0x` prefix, lowercase, no zero padding.
///
/// # Examples
/// ```
/// use memtape_core::hex;
///
/// assert_eq!(hex(0), "0x0");
/// assert_eq!(hex(0xBEEF), "0xbeef");
/// ```
pub fn hex(value: u64) -> String {
    format!("{value:#x}")
}

/// Byte value in lowercase hex without a prefix.
pub fn byte(value: u8) -> String {
    format!("{value:x}")
}

//! UTF-16 code unit arithmetic over `&str`.
//!
//! Chat transports report entity offsets and lengths in UTF-16 code units,
//! while Rust strings are indexed by UTF-8 bytes. These helpers translate
//! between the two so every offset in this workspace stays in UTF-16 units.

/// Number of UTF-16 code units needed to encode `s`.
pub fn len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the first char boundary at or after `units` UTF-16 units.
///
/// Clamped to `s.len()` when `units` is past the end of the string.
pub fn byte_offset(s: &str, units: usize) -> usize {
    let mut consumed = 0;
    for (idx, c) in s.char_indices() {
        if consumed >= units {
            return idx;
        }
        consumed += c.len_utf16();
    }
    s.len()
}

/// Byte index of the last char boundary whose UTF-16 prefix fits in `units`.
pub fn floor_byte_offset(s: &str, units: usize) -> usize {
    let mut consumed = 0;
    for (idx, c) in s.char_indices() {
        consumed += c.len_utf16();
        if consumed > units {
            return idx;
        }
    }
    s.len()
}

/// Substring covering `length` UTF-16 units starting at `offset`.
///
/// Out-of-range bounds are clamped, so the result may be shorter than asked.
pub fn slice(s: &str, offset: usize, length: usize) -> &str {
    let start = byte_offset(s, offset);
    let end = byte_offset(s, offset.saturating_add(length));
    &s[start..end.max(start)]
}

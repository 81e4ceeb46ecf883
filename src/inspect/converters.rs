// SPDX-License-Identifier: MIT
//! Byte formatting helpers shared by the inspection tools

/// Placeholder shown for bytes without a printable glyph
pub const NON_PRINTABLE: char = '·';

#[inline]
pub fn is_printable(b: u8) -> bool {
    (0x20..0x7f).contains(&b)
}

pub fn u8_to_hex(b: u8) -> String {
    format!("{:02x}", b)
}

pub fn u8_to_bin(b: u8) -> String {
    format!("{:08b}", b)
}

pub fn u8_to_char(b: u8) -> char {
    if is_printable(b) {
        char::from(b)
    } else {
        NON_PRINTABLE
    }
}

pub fn hex_to_u8(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

pub fn bin_to_u8(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 2).ok()
}

/// Lowercase hex string of a byte range
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Classic `offset  hex  |ascii|` dump, `width` bytes per row
pub fn hex_dump(bytes: &[u8], base_offset: usize, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(width).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| u8_to_hex(*b)).collect();
        let ascii: String = chunk.iter().map(|b| u8_to_char(*b)).collect();
        out.push_str(&format!(
            "{:08x}  {:<pad$}  |{}|\n",
            base_offset + row * width,
            hex.join(" "),
            ascii,
            pad = width * 3 - 1
        ));
    }
    out
}

// SPDX-License-Identifier: MIT
//! Fixed-width integer codec.
//!
//! Values travel as `i128` so that every 64-bit pattern, signed or not,
//! is representable without loss.

use serde::{Deserialize, Serialize};

/// Byte order of a multi-byte value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Marker character used in format strings
    pub fn marker(self) -> char {
        match self {
            Endianness::Little => '<',
            Endianness::Big => '>',
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '<' => Some(Endianness::Little),
            '>' => Some(Endianness::Big),
            _ => None,
        }
    }
}

/// Supported integer widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    #[inline]
    pub fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    pub fn all() -> &'static [IntWidth] {
        &[IntWidth::W8, IntWidth::W16, IntWidth::W32, IntWidth::W64]
    }
}

/// Decode the first `width.bytes()` bytes of `bytes`.
///
/// Returns `None` if fewer bytes are available.
pub fn decode_int(bytes: &[u8], width: IntWidth, signed: bool, endian: Endianness) -> Option<i128> {
    let n = width.bytes();
    let raw = bytes.get(..n)?;

    let mut value: u128 = 0;
    let mut accumulate = |b: &u8| value = (value << 8) | u128::from(*b);
    match endian {
        Endianness::Big => raw.iter().for_each(&mut accumulate),
        Endianness::Little => raw.iter().rev().for_each(&mut accumulate),
    }

    let bits = width.bits();
    let mut result = value as i128;
    if signed && value >= 1u128 << (bits - 1) {
        result -= 1i128 << bits;
    }
    Some(result)
}

/// Encode `value` into `width.bytes()` bytes, keeping only the low `width` bits.
pub fn encode_int(value: i128, width: IntWidth, endian: Endianness) -> Vec<u8> {
    let n = width.bytes();
    let mask: u128 = (1u128 << width.bits()) - 1;
    let mut v = (value as u128) & mask;

    let mut out = vec![0u8; n];
    for slot in out.iter_mut().rev() {
        *slot = (v & 0xff) as u8;
        v >>= 8;
    }
    if endian == Endianness::Little {
        out.reverse();
    }
    out
}

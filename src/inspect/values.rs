// SPDX-License-Identifier: MIT
//! Every common interpretation of the bytes under a cursor.

use serde::Serialize;

use super::converters::{u8_to_bin, u8_to_char};
use crate::buffer::{decode_int, Endianness, IntWidth};

/// Interpretations of the bytes starting at some offset.
///
/// Each integer field is `None` when fewer bytes than its width remain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueSet {
    pub bin: Option<String>,
    pub chr: Option<char>,
    pub i8: Option<i64>,
    pub u8: Option<u64>,
    pub i16: Option<i64>,
    pub u16: Option<u64>,
    pub i32: Option<i64>,
    pub u32: Option<u64>,
    pub i64: Option<i64>,
    pub u64: Option<u64>,
}

impl ValueSet {
    pub fn decode(bytes: &[u8], endian: Endianness) -> Self {
        let signed = |width| decode_int(bytes, width, true, endian).map(|v| v as i64);
        let unsigned = |width| decode_int(bytes, width, false, endian).map(|v| v as u64);

        Self {
            bin: bytes.first().map(|b| u8_to_bin(*b)),
            chr: bytes.first().map(|b| u8_to_char(*b)),
            i8: signed(IntWidth::W8),
            u8: unsigned(IntWidth::W8),
            i16: signed(IntWidth::W16),
            u16: unsigned(IntWidth::W16),
            i32: signed(IntWidth::W32),
            u32: unsigned(IntWidth::W32),
            i64: signed(IntWidth::W64),
            u64: unsigned(IntWidth::W64),
        }
    }

    /// `(label, rendered value)` rows, `-` for missing entries
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        fn show<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
        }

        vec![
            ("bin", show(&self.bin)),
            ("chr", show(&self.chr)),
            ("i8", show(&self.i8)),
            ("u8", show(&self.u8)),
            ("i16", show(&self.i16)),
            ("u16", show(&self.u16)),
            ("i32", show(&self.i32)),
            ("u32", show(&self.u32)),
            ("i64", show(&self.i64)),
            ("u64", show(&self.u64)),
        ]
    }
}

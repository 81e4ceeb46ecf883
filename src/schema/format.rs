// SPDX-License-Identifier: MIT
//! Type codes accepted in struct format strings
//!
//! A simplified subset of Python's `struct` format characters:
//!
//! | Code | Type | Size |
//! |------|------|------|
//! | `x` | pad byte (no value) | 1 |
//! | `c` | char | 1 |
//! | `b` / `B` | int8 / uint8 | 1 |
//! | `?` | bool | 1 |
//! | `h` / `H` | int16 / uint16 | 2 |
//! | `i` / `I` | int32 / uint32 | 4 |
//! | `f` | float32 | 4 |
//! | `d` | float64 | 8 |
//! | `s` | string (repeat count = length) | 1 |

use serde::{Deserialize, Serialize};

use crate::buffer::IntWidth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCode {
    Pad,
    Char,
    Int8,
    UInt8,
    Bool,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    String,
}

impl TypeCode {
    /// All type codes in format-character order
    pub fn all() -> &'static [TypeCode] {
        &[
            TypeCode::Pad,
            TypeCode::Char,
            TypeCode::Int8,
            TypeCode::UInt8,
            TypeCode::Bool,
            TypeCode::Int16,
            TypeCode::UInt16,
            TypeCode::Int32,
            TypeCode::UInt32,
            TypeCode::Float32,
            TypeCode::Float64,
            TypeCode::String,
        ]
    }

    pub fn from_char(c: char) -> Option<Self> {
        let code = match c {
            'x' => TypeCode::Pad,
            'c' => TypeCode::Char,
            'b' => TypeCode::Int8,
            'B' => TypeCode::UInt8,
            '?' => TypeCode::Bool,
            'h' => TypeCode::Int16,
            'H' => TypeCode::UInt16,
            'i' => TypeCode::Int32,
            'I' => TypeCode::UInt32,
            'f' => TypeCode::Float32,
            'd' => TypeCode::Float64,
            's' => TypeCode::String,
            _ => return None,
        };
        Some(code)
    }

    pub fn as_char(&self) -> char {
        match self {
            TypeCode::Pad => 'x',
            TypeCode::Char => 'c',
            TypeCode::Int8 => 'b',
            TypeCode::UInt8 => 'B',
            TypeCode::Bool => '?',
            TypeCode::Int16 => 'h',
            TypeCode::UInt16 => 'H',
            TypeCode::Int32 => 'i',
            TypeCode::UInt32 => 'I',
            TypeCode::Float32 => 'f',
            TypeCode::Float64 => 'd',
            TypeCode::String => 's',
        }
    }

    /// Size in bytes of one element
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            TypeCode::Pad
            | TypeCode::Char
            | TypeCode::Int8
            | TypeCode::UInt8
            | TypeCode::Bool
            | TypeCode::String => 1,
            TypeCode::Int16 | TypeCode::UInt16 => 2,
            TypeCode::Int32 | TypeCode::UInt32 | TypeCode::Float32 => 4,
            TypeCode::Float64 => 8,
        }
    }

    /// Width and signedness for integer codes
    pub fn int_layout(&self) -> Option<(IntWidth, bool)> {
        match self {
            TypeCode::Int8 => Some((IntWidth::W8, true)),
            TypeCode::UInt8 => Some((IntWidth::W8, false)),
            TypeCode::Int16 => Some((IntWidth::W16, true)),
            TypeCode::UInt16 => Some((IntWidth::W16, false)),
            TypeCode::Int32 => Some((IntWidth::W32, true)),
            TypeCode::UInt32 => Some((IntWidth::W32, false)),
            _ => None,
        }
    }

    /// Human-readable name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            TypeCode::Pad => "pad",
            TypeCode::Char => "char",
            TypeCode::Int8 => "int8",
            TypeCode::UInt8 => "uint8",
            TypeCode::Bool => "bool",
            TypeCode::Int16 => "int16",
            TypeCode::UInt16 => "uint16",
            TypeCode::Int32 => "int32",
            TypeCode::UInt32 => "uint32",
            TypeCode::Float32 => "float32",
            TypeCode::Float64 => "float64",
            TypeCode::String => "string",
        }
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_mapping_is_bijective() {
        for code in TypeCode::all() {
            assert_eq!(TypeCode::from_char(code.as_char()), Some(*code));
        }
        assert_eq!(TypeCode::all().len(), 12);
    }

    #[test]
    fn test_unknown_codes() {
        for c in ['q', 'Q', 'l', 'e', ' ', '<'] {
            assert_eq!(TypeCode::from_char(c), None);
        }
    }

    #[test]
    fn test_sizes() {
        assert_eq!(TypeCode::Pad.size(), 1);
        assert_eq!(TypeCode::Int16.size(), 2);
        assert_eq!(TypeCode::UInt32.size(), 4);
        assert_eq!(TypeCode::Float32.size(), 4);
        assert_eq!(TypeCode::Float64.size(), 8);
        assert_eq!(TypeCode::String.size(), 1);
    }

    #[test]
    fn test_int_layout() {
        assert_eq!(TypeCode::Int8.int_layout(), Some((IntWidth::W8, true)));
        assert_eq!(TypeCode::UInt32.int_layout(), Some((IntWidth::W32, false)));
        assert_eq!(TypeCode::Bool.int_layout(), None);
        assert_eq!(TypeCode::Float64.int_layout(), None);
    }
}
